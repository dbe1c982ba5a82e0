use std::{
    env,
    net::{AddrParseError, SocketAddr},
    time::Duration,
};

use reqwest::Url;
use thiserror::Error;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SOURCE_URL: &str = "http://127.0.0.1:9000/api";
const DEFAULT_DB_PATH: &str = "data/parlays.db";
const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 10;

const ENV_ADDR_KEY: &str = "SGP_SERVER_ADDR";
const ENV_SOURCE_URL_KEY: &str = "SGP_SOURCE_URL";
const ENV_DB_PATH_KEY: &str = "SGP_DB_PATH";
const ENV_ADMIN_TOKEN_KEY: &str = "SGP_ADMIN_TOKEN";
const ENV_RUN_BUDGET_KEY: &str = "SGP_RUN_BUDGET_SECS";
const ENV_SOURCE_TIMEOUT_KEY: &str = "SGP_SOURCE_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub source_url: String,
    pub db_path: String,
    pub admin_token: Option<String>,
    pub run_budget: Option<Duration>,
    pub source_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SGP_SERVER_ADDR is not a valid socket address: {0}")]
    InvalidListenAddr(#[source] AddrParseError),
    #[error("SGP_SOURCE_URL must be an absolute http or https URL")]
    InvalidSourceUrl,
    #[error("SGP_DB_PATH must not be empty or whitespace")]
    InvalidDbPath,
    #[error("SGP_RUN_BUDGET_SECS must be a positive whole number of seconds")]
    InvalidRunBudget,
    #[error("SGP_SOURCE_TIMEOUT_SECS must be a positive whole number of seconds")]
    InvalidSourceTimeout,
    #[error("{0} contains non-unicode data")]
    NonUnicode(&'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match read_env(ENV_ADDR_KEY)? {
            Some(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            None => DEFAULT_LISTEN_ADDR
                .parse()
                .expect("default listen address must be valid"),
        };

        let source_url = match read_env(ENV_SOURCE_URL_KEY)? {
            Some(value) => {
                let is_http = Url::parse(value.trim())
                    .map(|url| matches!(url.scheme(), "http" | "https"))
                    .unwrap_or(false);
                if !is_http {
                    return Err(ConfigError::InvalidSourceUrl);
                }
                value.trim().to_owned()
            }
            None => DEFAULT_SOURCE_URL.to_owned(),
        };

        let db_path = match read_env(ENV_DB_PATH_KEY)? {
            Some(value) => {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidDbPath);
                }
                value
            }
            None => DEFAULT_DB_PATH.to_owned(),
        };

        let admin_token = read_env(ENV_ADMIN_TOKEN_KEY)?.filter(|token| !token.trim().is_empty());

        let run_budget = read_env(ENV_RUN_BUDGET_KEY)?
            .map(|value| parse_positive_secs(&value).ok_or(ConfigError::InvalidRunBudget))
            .transpose()?;

        let source_timeout = match read_env(ENV_SOURCE_TIMEOUT_KEY)? {
            Some(value) => {
                parse_positive_secs(&value).ok_or(ConfigError::InvalidSourceTimeout)?
            }
            None => Duration::from_secs(DEFAULT_SOURCE_TIMEOUT_SECS),
        };

        Ok(Self {
            listen_addr,
            source_url,
            db_path,
            admin_token,
            run_budget,
            source_timeout,
        })
    }
}

fn read_env(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NonUnicode(key)),
    }
}

fn parse_positive_secs(value: &str) -> Option<Duration> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use std::{env, sync::Mutex, time::Duration};

    use super::{
        Config, ConfigError, ENV_ADDR_KEY, ENV_ADMIN_TOKEN_KEY, ENV_DB_PATH_KEY,
        ENV_RUN_BUDGET_KEY, ENV_SOURCE_TIMEOUT_KEY, ENV_SOURCE_URL_KEY,
    };

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct EnvVarGuard {
        key: &'static str,
        previous: Option<std::ffi::OsString>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }

        fn unset(key: &'static str) -> Self {
            let previous = env::var_os(key);
            env::remove_var(key);
            Self { key, previous }
        }

        #[cfg(unix)]
        fn set_os(key: &'static str, value: std::ffi::OsString) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match self.previous.take() {
                Some(value) => env::set_var(self.key, value),
                None => env::remove_var(self.key),
            }
        }
    }

    fn reset_config_env_baseline() -> [EnvVarGuard; 6] {
        [
            EnvVarGuard::unset(ENV_ADDR_KEY),
            EnvVarGuard::unset(ENV_SOURCE_URL_KEY),
            EnvVarGuard::unset(ENV_DB_PATH_KEY),
            EnvVarGuard::unset(ENV_ADMIN_TOKEN_KEY),
            EnvVarGuard::unset(ENV_RUN_BUDGET_KEY),
            EnvVarGuard::unset(ENV_SOURCE_TIMEOUT_KEY),
        ]
    }

    #[test]
    fn defaults_apply_when_env_is_unset() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.source_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.db_path, "data/parlays.db");
        assert_eq!(config.admin_token, None);
        assert_eq!(config.run_budget, None);
        assert_eq!(config.source_timeout, Duration::from_secs(10));
    }

    #[test]
    fn uses_overrides_from_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _addr = EnvVarGuard::set(ENV_ADDR_KEY, "127.0.0.1:9090");
        let _url = EnvVarGuard::set(ENV_SOURCE_URL_KEY, "https://odds.example.com/v2");
        let _db = EnvVarGuard::set(ENV_DB_PATH_KEY, "/var/lib/sgp/parlays.db");
        let _token = EnvVarGuard::set(ENV_ADMIN_TOKEN_KEY, "s3cret");
        let _budget = EnvVarGuard::set(ENV_RUN_BUDGET_KEY, "45");
        let _timeout = EnvVarGuard::set(ENV_SOURCE_TIMEOUT_KEY, "3");

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:9090".parse().unwrap());
        assert_eq!(config.source_url, "https://odds.example.com/v2");
        assert_eq!(config.db_path, "/var/lib/sgp/parlays.db");
        assert_eq!(config.admin_token.as_deref(), Some("s3cret"));
        assert_eq!(config.run_budget, Some(Duration::from_secs(45)));
        assert_eq!(config.source_timeout, Duration::from_secs(3));
    }

    #[test]
    fn returns_error_for_invalid_listen_address_override() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(ENV_ADDR_KEY, "not-an-addr");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidListenAddr(_)));
    }

    #[test]
    fn returns_error_for_non_http_source_url() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(ENV_SOURCE_URL_KEY, "ftp://odds.example.com");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidSourceUrl));
    }

    #[test]
    fn returns_error_for_whitespace_db_path() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(ENV_DB_PATH_KEY, "   ");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidDbPath));
    }

    #[test]
    fn blank_admin_token_is_treated_as_unset() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(ENV_ADMIN_TOKEN_KEY, "  ");

        let config = Config::from_env().unwrap();

        assert_eq!(config.admin_token, None);
    }

    #[test]
    fn returns_error_for_zero_or_garbage_durations() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();

        {
            let _guard = EnvVarGuard::set(ENV_RUN_BUDGET_KEY, "0");
            assert!(matches!(
                Config::from_env().unwrap_err(),
                ConfigError::InvalidRunBudget
            ));
        }
        {
            let _guard = EnvVarGuard::set(ENV_SOURCE_TIMEOUT_KEY, "ten");
            assert!(matches!(
                Config::from_env().unwrap_err(),
                ConfigError::InvalidSourceTimeout
            ));
        }
    }

    #[cfg(unix)]
    #[test]
    fn returns_error_for_non_unicode_env_var() {
        use std::os::unix::ffi::OsStringExt;

        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set_os(
            ENV_DB_PATH_KEY,
            std::ffi::OsString::from_vec(vec![0x66, 0x6f, 0x80]),
        );

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::NonUnicode(ENV_DB_PATH_KEY)));
    }
}
