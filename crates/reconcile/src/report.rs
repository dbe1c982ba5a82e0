//! What one sync run reports back: outcome counts plus a latency summary.

use serde::Serialize;

use crate::logging::RunLogEventKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub generated: usize,
    pub created: usize,
    pub skipped: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub stats: SyncStats,
    pub stopped_early: bool,
    /// `None` when no candidate was attempted.
    pub latency: Option<LatencyPercentiles>,
}

/// Nearest-rank summary of per-candidate sync latency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatencyPercentiles {
    pub count: usize,
    pub p50_micros: u64,
    pub p90_micros: u64,
    pub p95_micros: u64,
    pub p99_micros: u64,
    pub max_micros: u64,
}

impl LatencyPercentiles {
    fn from_samples(mut samples: Vec<u64>) -> Option<Self> {
        samples.sort_unstable();
        let max_micros = *samples.last()?;
        let count = samples.len();
        let rank = |percentile: usize| samples[(percentile * count).div_ceil(100).saturating_sub(1)];

        Some(Self {
            count,
            p50_micros: rank(50),
            p90_micros: rank(90),
            p95_micros: rank(95),
            p99_micros: rank(99),
            max_micros,
        })
    }
}

/// Folds each attempted candidate into the run's counts and latency samples.
#[derive(Debug)]
pub(crate) struct RunTally {
    stats: SyncStats,
    latencies_micros: Vec<u64>,
}

impl RunTally {
    pub(crate) fn new(generated: usize) -> Self {
        Self {
            stats: SyncStats {
                generated,
                ..SyncStats::default()
            },
            latencies_micros: Vec::with_capacity(generated),
        }
    }

    /// Run-level kinds are ignored; they carry no candidate latency.
    pub(crate) fn record(&mut self, kind: RunLogEventKind, latency_micros: u64) {
        match kind {
            RunLogEventKind::ParlayCreated => self.stats.created += 1,
            RunLogEventKind::CandidateFailed => self.stats.errors += 1,
            kind if kind.is_skip() => self.stats.skipped += 1,
            _ => return,
        }
        self.latencies_micros.push(latency_micros);
    }

    pub(crate) fn finish(self, stopped_early: bool) -> SyncReport {
        SyncReport {
            stats: self.stats,
            stopped_early,
            latency: LatencyPercentiles::from_samples(self.latencies_micros),
        }
    }
}
