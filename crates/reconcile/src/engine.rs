//! Reconciles ranked candidates against the store, one candidate at a time.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use parlay::{
    classify, constants::is_placeholder_team, constants::SINGLE_GAME_PARLAY_TYPE,
    CandidateParlay, ComposeError, Composition, Fingerprint,
};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{
    locks::MatchLocks,
    logging::{RunLogEvent, RunLogEventKind, RunLogWriter},
    report::{RunTally, SyncReport},
    store::{MatchRecord, NewLeg, NewParlay, ParlayStatus, ParlayStore, StoreError},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Wall-clock budget for one run, checked between candidates.
    pub run_budget: Option<Duration>,
}

/// Cooperative early termination, honoured between candidates.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("cannot price parlay: {0}")]
    Compose(#[from] ComposeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    UnknownMatch,
    PlaceholderTeams,
    AlreadySynced,
    ConcurrentInsert,
}

impl SkipReason {
    fn log_kind(self) -> RunLogEventKind {
        match self {
            Self::UnknownMatch => RunLogEventKind::SkippedUnknownMatch,
            Self::PlaceholderTeams => RunLogEventKind::SkippedPlaceholderTeams,
            Self::AlreadySynced => RunLogEventKind::SkippedAlreadySynced,
            Self::ConcurrentInsert => RunLogEventKind::SkippedConcurrentInsert,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateOutcome {
    Created { parlay_id: i64 },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTeams {
    pub home: String,
    pub away: String,
}

pub struct SyncEngine {
    store: Arc<dyn ParlayStore>,
    locks: MatchLocks,
    options: SyncOptions,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn ParlayStore>, options: SyncOptions) -> Self {
        Self {
            store,
            locks: MatchLocks::new(),
            options,
        }
    }

    /// Syncs candidates in the given (ranked) order. Per-candidate failures
    /// are counted and never abort the run.
    pub async fn sync(
        &self,
        candidates: &[CandidateParlay],
        stop: &StopSignal,
        log: &mut (dyn RunLogWriter + Send),
    ) -> SyncReport {
        let started = Instant::now();
        let mut tally = RunTally::new(candidates.len());
        let mut stopped_early = false;
        let mut processed = 0_u64;

        log.write(RunLogEvent::new(0, RunLogEventKind::RunStarted));
        info!(candidates = candidates.len(), "starting single-game parlay sync");

        for candidate in candidates {
            if let Some(reason) = self.stop_reason(stop, started) {
                stopped_early = true;
                warn!(
                    processed,
                    remaining = candidates.len() as u64 - processed,
                    reason,
                    "stopping parlay sync early"
                );
                log.write(RunLogEvent::new(processed, RunLogEventKind::StoppedEarly).with_detail(reason));
                break;
            }

            let candidate_started = Instant::now();
            let result = self.sync_candidate(candidate).await;
            let latency_micros =
                u64::try_from(candidate_started.elapsed().as_micros()).unwrap_or(u64::MAX);

            // Only failures are logged here; the journal writer covers the rest.
            let event = match result {
                Ok(CandidateOutcome::Created { parlay_id }) => {
                    RunLogEvent::new(processed, RunLogEventKind::ParlayCreated)
                        .with_detail(format!("parlay {parlay_id} {}", candidate.fingerprint()))
                }
                Ok(CandidateOutcome::Skipped(reason)) => {
                    RunLogEvent::new(processed, reason.log_kind())
                }
                Err(err) => {
                    warn!(
                        match_id = %candidate.match_id,
                        error = %err,
                        "failed to sync parlay candidate"
                    );
                    RunLogEvent::new(processed, RunLogEventKind::CandidateFailed)
                        .with_detail(err.to_string())
                }
            };
            tally.record(event.kind, latency_micros);
            log.write(
                event
                    .for_match(candidate.match_id.clone())
                    .with_latency_micros(latency_micros),
            );
            processed += 1;
        }

        self.locks.prune_idle();
        let report = tally.finish(stopped_early);
        log.write(RunLogEvent::new(processed, RunLogEventKind::RunFinished));
        info!(
            generated = report.stats.generated,
            created = report.stats.created,
            skipped = report.stats.skipped,
            errors = report.stats.errors,
            stopped_early,
            p95_micros = report.latency.as_ref().map(|latency| latency.p95_micros),
            "finished single-game parlay sync"
        );
        report
    }

    fn stop_reason(&self, stop: &StopSignal, started: Instant) -> Option<&'static str> {
        if stop.is_stopped() {
            return Some("stop requested");
        }
        match self.options.run_budget {
            Some(budget) if started.elapsed() >= budget => Some("run budget exhausted"),
            _ => None,
        }
    }

    async fn sync_candidate(
        &self,
        candidate: &CandidateParlay,
    ) -> Result<CandidateOutcome, SyncError> {
        let Some(record) = self.store.find_match(&candidate.match_id).await? else {
            return Ok(CandidateOutcome::Skipped(SkipReason::UnknownMatch));
        };
        let Some(teams) = resolve_teams(&record, candidate) else {
            return Ok(CandidateOutcome::Skipped(SkipReason::PlaceholderTeams));
        };

        let fingerprint = candidate.fingerprint();
        let outcomes = candidate.outcomes();

        // Held across lookup and create so one process never races itself.
        let _guard = self.locks.acquire(&candidate.match_id).await;

        let existing = self
            .store
            .find_single_game_parlays(&candidate.match_id, &outcomes)
            .await?;
        if existing
            .iter()
            .any(|parlay| parlay.has_same_legs(&fingerprint, candidate.legs.len()))
        {
            return Ok(CandidateOutcome::Skipped(SkipReason::AlreadySynced));
        }

        let parlay = build_parlay(
            candidate,
            &record,
            teams,
            fingerprint,
            OffsetDateTime::now_utc(),
        )?;
        match self.store.create_parlay(parlay).await {
            Ok(created) => Ok(CandidateOutcome::Created {
                parlay_id: created.id,
            }),
            // Another writer got there first; the stored row is the same parlay.
            Err(StoreError::Conflict { .. }) => {
                Ok(CandidateOutcome::Skipped(SkipReason::ConcurrentInsert))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Ground truth wins when it names a real team; otherwise the snapshot's
/// name is used. Both sides must end up non-placeholder.
pub fn resolve_teams(record: &MatchRecord, candidate: &CandidateParlay) -> Option<ResolvedTeams> {
    Some(ResolvedTeams {
        home: resolve_team_name(record.home_team.as_deref(), &candidate.home_team)?,
        away: resolve_team_name(record.away_team.as_deref(), &candidate.away_team)?,
    })
}

fn resolve_team_name(ground_truth: Option<&str>, snapshot: &str) -> Option<String> {
    ground_truth
        .into_iter()
        .chain(std::iter::once(snapshot))
        .find(|name| !is_placeholder_team(name))
        .map(|name| name.trim().to_string())
}

/// Builds the write model. Pricing is recomputed from the final leg list.
pub fn build_parlay(
    candidate: &CandidateParlay,
    record: &MatchRecord,
    teams: ResolvedTeams,
    fingerprint: Fingerprint,
    synced_at: OffsetDateTime,
) -> Result<NewParlay, ComposeError> {
    let composition = Composition::from_legs(&candidate.legs)?;
    let confidence = classify(composition.combined_prob, composition.leg_count);
    let kickoff = record.kickoff.unwrap_or(candidate.kickoff);
    let league = record
        .league
        .clone()
        .filter(|league| !league.trim().is_empty())
        .unwrap_or_else(|| candidate.league.clone());
    let edge_share_pct = composition.edge_pct / composition.leg_count as f64;

    let legs = candidate
        .legs
        .iter()
        .enumerate()
        .map(|(index, leg)| NewLeg {
            position: index as u32 + 1,
            outcome: leg.outcome,
            description: leg.description.clone(),
            home_team: teams.home.clone(),
            away_team: teams.away.clone(),
            model_probability: leg.probability,
            decimal_odds: 1.0 / leg.probability,
            edge_share_pct,
        })
        .collect();

    Ok(NewParlay {
        match_id: candidate.match_id.clone(),
        fingerprint,
        parlay_type: SINGLE_GAME_PARLAY_TYPE.to_string(),
        leg_count: composition.leg_count,
        combined_prob: composition.combined_prob,
        correlation_penalty: composition.correlation_penalty,
        adjusted_prob: composition.adjusted_prob,
        fair_odds: composition.fair_odds,
        implied_odds: composition.implied_odds,
        edge_pct: composition.edge_pct,
        confidence,
        league,
        window_start: kickoff,
        window_end: kickoff,
        status: ParlayStatus::Active,
        synced_at,
        legs,
    })
}
