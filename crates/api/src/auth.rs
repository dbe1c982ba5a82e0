use axum::http::{header, HeaderMap};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdminAuthError {
    /// No `Authorization` header at all.
    MissingCredentials,
    /// Credentials present but not the admin token, or no token configured.
    Forbidden,
}

/// Checks `Authorization: Bearer <token>` against the configured admin token.
pub fn authorize_admin(headers: &HeaderMap, admin_token: Option<&str>) -> Result<(), AdminAuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AdminAuthError::MissingCredentials)?;
    let Some(expected) = admin_token else {
        return Err(AdminAuthError::Forbidden);
    };
    let presented = value
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(AdminAuthError::Forbidden)?;

    if constant_time_eq(presented.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(AdminAuthError::Forbidden)
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderMap, HeaderValue};

    use super::{authorize_admin, constant_time_eq, AdminAuthError};

    fn headers(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(authorization).unwrap(),
        );
        headers
    }

    #[test]
    fn missing_header_is_unauthenticated() {
        assert_eq!(
            authorize_admin(&HeaderMap::new(), Some("s3cret")),
            Err(AdminAuthError::MissingCredentials)
        );
    }

    #[test]
    fn matching_bearer_token_is_accepted() {
        assert_eq!(authorize_admin(&headers("Bearer s3cret"), Some("s3cret")), Ok(()));
    }

    #[test]
    fn wrong_scheme_or_token_is_forbidden() {
        assert_eq!(
            authorize_admin(&headers("Bearer nope"), Some("s3cret")),
            Err(AdminAuthError::Forbidden)
        );
        assert_eq!(
            authorize_admin(&headers("Basic s3cret"), Some("s3cret")),
            Err(AdminAuthError::Forbidden)
        );
    }

    #[test]
    fn unconfigured_token_forbids_everyone() {
        assert_eq!(
            authorize_admin(&headers("Bearer anything"), None),
            Err(AdminAuthError::Forbidden)
        );
    }

    #[test]
    fn constant_time_eq_requires_equal_length() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(!constant_time_eq(b"abc", b"abd"));
    }
}
