#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLogEventKind {
    RunStarted,
    ParlayCreated,
    SkippedUnknownMatch,
    SkippedPlaceholderTeams,
    SkippedAlreadySynced,
    SkippedConcurrentInsert,
    CandidateFailed,
    StoppedEarly,
    RunFinished,
}

impl RunLogEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RunStarted => "run_started",
            Self::ParlayCreated => "parlay_created",
            Self::SkippedUnknownMatch => "skipped_unknown_match",
            Self::SkippedPlaceholderTeams => "skipped_placeholder_teams",
            Self::SkippedAlreadySynced => "skipped_already_synced",
            Self::SkippedConcurrentInsert => "skipped_concurrent_insert",
            Self::CandidateFailed => "candidate_failed",
            Self::StoppedEarly => "stopped_early",
            Self::RunFinished => "run_finished",
        }
    }

    pub fn is_skip(self) -> bool {
        matches!(
            self,
            Self::SkippedUnknownMatch
                | Self::SkippedPlaceholderTeams
                | Self::SkippedAlreadySynced
                | Self::SkippedConcurrentInsert
        )
    }
}

/// One journal line. `sequence` is the candidate's position in ranked order;
/// run-level events use the number of candidates processed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLogEvent {
    pub sequence: u64,
    pub kind: RunLogEventKind,
    pub match_id: Option<String>,
    pub sync_latency_micros: Option<u64>,
    pub detail: Option<String>,
}

impl RunLogEvent {
    pub fn new(sequence: u64, kind: RunLogEventKind) -> Self {
        Self {
            sequence,
            kind,
            match_id: None,
            sync_latency_micros: None,
            detail: None,
        }
    }

    pub fn for_match(mut self, match_id: impl Into<String>) -> Self {
        self.match_id = Some(match_id.into());
        self
    }

    pub fn with_latency_micros(mut self, latency_micros: u64) -> Self {
        self.sync_latency_micros = Some(latency_micros);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

pub trait RunLogWriter {
    fn write(&mut self, event: RunLogEvent);
}

#[derive(Debug, Default)]
pub struct InMemoryRunLogWriter {
    events: Vec<RunLogEvent>,
}

impl InMemoryRunLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RunLogEvent] {
        &self.events
    }

    pub fn count(&self, kind: RunLogEventKind) -> usize {
        self.events.iter().filter(|event| event.kind == kind).count()
    }
}

impl RunLogWriter for InMemoryRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        self.events.push(event);
    }
}

/// Forwards each event to `tracing` at debug level, under the
/// `sgp::journal` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRunLogWriter;

impl RunLogWriter for TracingRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        tracing::debug!(
            target: "sgp::journal",
            sequence = event.sequence,
            kind = event.kind.as_str(),
            match_id = event.match_id.as_deref(),
            sync_latency_micros = event.sync_latency_micros,
            detail = event.detail.as_deref(),
            "sync journal event"
        );
    }
}

/// Drops every event. For callers that only need the run stats.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardRunLogWriter;

impl RunLogWriter for DiscardRunLogWriter {
    fn write(&mut self, _event: RunLogEvent) {}
}

#[cfg(test)]
mod tests {
    use super::{
        InMemoryRunLogWriter, RunLogEvent, RunLogEventKind, RunLogWriter, TracingRunLogWriter,
    };

    #[test]
    fn in_memory_writer_keeps_events_in_order() {
        let mut writer = InMemoryRunLogWriter::new();

        writer.write(RunLogEvent::new(0, RunLogEventKind::RunStarted));
        writer.write(
            RunLogEvent::new(1, RunLogEventKind::ParlayCreated)
                .for_match("m-1")
                .with_latency_micros(42),
        );

        assert_eq!(writer.events().len(), 2);
        assert_eq!(writer.events()[1].match_id.as_deref(), Some("m-1"));
        assert_eq!(writer.events()[1].sync_latency_micros, Some(42));
        assert_eq!(writer.count(RunLogEventKind::ParlayCreated), 1);
    }

    #[test]
    fn skip_kinds_are_classified() {
        assert!(RunLogEventKind::SkippedAlreadySynced.is_skip());
        assert!(RunLogEventKind::SkippedConcurrentInsert.is_skip());
        assert!(!RunLogEventKind::ParlayCreated.is_skip());
        assert!(!RunLogEventKind::CandidateFailed.is_skip());
    }

    #[test]
    fn tracing_writer_accepts_events_without_a_subscriber() {
        let mut writer = TracingRunLogWriter;

        writer.write(
            RunLogEvent::new(3, RunLogEventKind::CandidateFailed)
                .for_match("m-9")
                .with_detail("store backend error: disk full"),
        );

        assert_eq!(RunLogEventKind::CandidateFailed.as_str(), "candidate_failed");
    }
}
