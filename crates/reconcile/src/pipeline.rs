use parlay::generate_candidates;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::{
    engine::{StopSignal, SyncEngine},
    logging::RunLogWriter,
    report::SyncStats,
    source::{fetch_snapshots, MarketSource, SourceError},
};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to fetch upcoming matches: {0}")]
    Fetch(#[from] SourceError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub stats: SyncStats,
    pub stopped_early: bool,
    pub matches_fetched: usize,
}

/// One generation-and-sync pass: fetch snapshots, generate ranked candidates,
/// then sync them. Only a failed fetch is fatal.
pub async fn run_once(
    source: &dyn MarketSource,
    engine: &SyncEngine,
    stop: &StopSignal,
    log: &mut (dyn RunLogWriter + Send),
) -> Result<RunSummary, RunError> {
    let snapshots = fetch_snapshots(source).await.map_err(|err| {
        error!(error = %err, "market fetch failed, aborting parlay run");
        RunError::from(err)
    })?;

    let candidates = generate_candidates(&snapshots);
    info!(
        matches = snapshots.len(),
        candidates = candidates.len(),
        "generated single-game parlay candidates"
    );

    let report = engine.sync(&candidates, stop, log).await;
    Ok(RunSummary {
        stats: report.stats,
        stopped_early: report.stopped_early,
        matches_fetched: snapshots.len(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parlay::{DnbMarket, MarketBundle, MatchSummary, TotalsMarket};
    use time::macros::datetime;

    use super::{run_once, RunError};
    use crate::{
        engine::{StopSignal, SyncEngine, SyncOptions},
        logging::{InMemoryRunLogWriter, RunLogEventKind},
        source::{SourceError, StaticMarketSource},
        store::{InMemoryParlayStore, MatchRecord},
    };

    fn summary(id: &str) -> MatchSummary {
        MatchSummary {
            id: id.to_string(),
            home_team: "Ajax".to_string(),
            away_team: "PSV".to_string(),
            league: "Eredivisie".to_string(),
            kickoff: datetime!(2026-10-25 13:30 UTC),
        }
    }

    fn bundle() -> MarketBundle {
        MarketBundle {
            dnb: Some(DnbMarket {
                home: 0.62,
                away: 0.38,
            }),
            totals: Some(TotalsMarket {
                under_3_5: Some(0.66),
                under_4_5: None,
                over_2_5: None,
            }),
            ..MarketBundle::default()
        }
    }

    #[tokio::test]
    async fn fetch_failure_is_fatal_and_writes_nothing() {
        let store = Arc::new(InMemoryParlayStore::new());
        let engine = SyncEngine::new(store.clone(), SyncOptions::default());
        let mut log = InMemoryRunLogWriter::new();

        let err = run_once(
            &StaticMarketSource::failing("upstream down"),
            &engine,
            &StopSignal::new(),
            &mut log,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            RunError::Fetch(SourceError::Unavailable(ref reason)) if reason == "upstream down"
        ));
        assert!(log.events().is_empty());
        assert!(store.parlays().is_empty());
    }

    #[tokio::test]
    async fn run_counts_fetched_matches_and_syncs_candidates() {
        let store = Arc::new(InMemoryParlayStore::new());
        store.upsert_match(MatchRecord {
            id: "m-1".to_string(),
            home_team: Some("Ajax".to_string()),
            away_team: Some("PSV".to_string()),
            league: Some("Eredivisie".to_string()),
            kickoff: Some(datetime!(2026-10-25 13:30 UTC)),
        });
        let engine = SyncEngine::new(store.clone(), SyncOptions::default());
        let source = StaticMarketSource::new()
            .with_match(summary("m-1"), Some(bundle()))
            .with_match(summary("m-2"), None);
        let mut log = InMemoryRunLogWriter::new();

        let summary = run_once(&source, &engine, &StopSignal::new(), &mut log)
            .await
            .unwrap();

        assert_eq!(summary.matches_fetched, 2);
        assert_eq!(summary.stats.generated, 1);
        assert_eq!(summary.stats.created, 1);
        assert!(!summary.stopped_early);
        assert_eq!(log.count(RunLogEventKind::RunFinished), 1);
    }
}
