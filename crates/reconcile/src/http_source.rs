use std::time::Duration;

use async_trait::async_trait;
use parlay::{MarketBundle, MatchSummary};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::source::{MarketSource, SourceError};

/// JSON market source:
/// `GET {base}/matches/upcoming` and `GET {base}/matches/{id}/markets`.
#[derive(Debug, Clone)]
pub struct HttpMarketSource {
    client: Client,
    base_url: Url,
}

impl HttpMarketSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let raw = base_url.into();
        let base_url =
            Url::parse(raw.trim()).map_err(|err| SourceError::InvalidUrl(format!("{raw}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::InvalidUrl(raw));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SourceError::Transport(err.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Appends percent-encoded path segments to the base URL, so ids
    /// containing `/`, `#`, `?` or spaces stay a single segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, SourceError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| SourceError::Transport(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|err| SourceError::Decode(err.to_string()))
    }
}

#[async_trait]
impl MarketSource for HttpMarketSource {
    async fn upcoming_matches(&self) -> Result<Vec<MatchSummary>, SourceError> {
        let url = self.endpoint(&["matches", "upcoming"])?;
        // The listing itself must exist; a 404 here is an upstream fault.
        match self.get_json(url.clone()).await? {
            Some(matches) => Ok(matches),
            None => Err(SourceError::Status {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND.as_u16(),
            }),
        }
    }

    async fn market_bundle(&self, match_id: &str) -> Result<Option<MarketBundle>, SourceError> {
        let url = self.endpoint(&["matches", match_id, "markets"])?;
        self.get_json(url).await
    }
}
