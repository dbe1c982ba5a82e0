//! Upstream fixtures and market probabilities.

use std::collections::HashMap;

use async_trait::async_trait;
use parlay::{MarketBundle, MatchSnapshot, MatchSummary};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("market source transport error: {0}")]
    Transport(String),
    #[error("market source returned status {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("market source payload could not be decoded: {0}")]
    Decode(String),
    #[error("market source unavailable: {0}")]
    Unavailable(String),
    #[error("market source URL is not usable: {0}")]
    InvalidUrl(String),
}

#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Upcoming, active fixtures.
    async fn upcoming_matches(&self) -> Result<Vec<MatchSummary>, SourceError>;

    /// Active market probabilities for one fixture, `None` when the fixture has none.
    async fn market_bundle(&self, match_id: &str) -> Result<Option<MarketBundle>, SourceError>;
}

/// Fetches every upcoming fixture with its markets. Any failure aborts the
/// whole fetch; a fixture without markets gets an empty bundle.
pub async fn fetch_snapshots(
    source: &dyn MarketSource,
) -> Result<Vec<MatchSnapshot>, SourceError> {
    let matches = source.upcoming_matches().await?;
    let mut snapshots = Vec::with_capacity(matches.len());

    for summary in matches {
        let markets = source.market_bundle(&summary.id).await?.unwrap_or_default();
        snapshots.push(MatchSnapshot::new(summary, markets));
    }

    Ok(snapshots)
}

/// Fixed in-memory source.
#[derive(Debug, Clone, Default)]
pub struct StaticMarketSource {
    matches: Vec<MatchSummary>,
    bundles: HashMap<String, MarketBundle>,
    failure: Option<String>,
}

impl StaticMarketSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match(mut self, summary: MatchSummary, markets: Option<MarketBundle>) -> Self {
        if let Some(markets) = markets {
            self.bundles.insert(summary.id.clone(), markets);
        }
        self.matches.push(summary);
        self
    }

    /// A source whose every call fails with `Unavailable`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    fn check_available(&self) -> Result<(), SourceError> {
        match &self.failure {
            Some(reason) => Err(SourceError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MarketSource for StaticMarketSource {
    async fn upcoming_matches(&self) -> Result<Vec<MatchSummary>, SourceError> {
        self.check_available()?;
        Ok(self.matches.clone())
    }

    async fn market_bundle(&self, match_id: &str) -> Result<Option<MarketBundle>, SourceError> {
        self.check_available()?;
        Ok(self.bundles.get(match_id).copied())
    }
}

#[cfg(test)]
mod tests {
    use parlay::{BttsMarket, MarketBundle, MatchSummary};
    use time::macros::datetime;

    use super::{fetch_snapshots, SourceError, StaticMarketSource};

    fn summary(id: &str) -> MatchSummary {
        MatchSummary {
            id: id.to_string(),
            home_team: "Porto".to_string(),
            away_team: "Benfica".to_string(),
            league: "Primeira Liga".to_string(),
            kickoff: datetime!(2026-10-20 20:15 UTC),
        }
    }

    #[tokio::test]
    async fn missing_bundle_becomes_empty_markets() {
        let bundle = MarketBundle {
            btts: Some(BttsMarket { yes: 0.6, no: 0.4 }),
            ..MarketBundle::default()
        };
        let source = StaticMarketSource::new()
            .with_match(summary("with-markets"), Some(bundle))
            .with_match(summary("without-markets"), None);

        let snapshots = fetch_snapshots(&source).await.unwrap();

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].markets, bundle);
        assert_eq!(snapshots[1].markets, MarketBundle::default());
    }

    #[tokio::test]
    async fn failing_source_aborts_fetch() {
        let source = StaticMarketSource::failing("feed offline");

        let err = fetch_snapshots(&source).await.unwrap_err();

        assert_eq!(err, SourceError::Unavailable("feed offline".to_string()));
    }
}
