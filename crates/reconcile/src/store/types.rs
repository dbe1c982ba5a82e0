use parlay::{Confidence, Fingerprint, Outcome};
use serde::Serialize;
use time::OffsetDateTime;

/// Ground-truth fixture data held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub id: String,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub league: Option<String>,
    pub kickoff: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParlayStatus {
    Active,
}

impl ParlayStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLeg {
    pub position: u32,
    pub outcome: Outcome,
    pub description: String,
    pub home_team: String,
    pub away_team: String,
    pub model_probability: f64,
    pub decimal_odds: f64,
    pub edge_share_pct: f64,
}

/// A parlay and its legs as written in one all-or-nothing create.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewParlay {
    pub match_id: String,
    pub fingerprint: Fingerprint,
    pub parlay_type: String,
    pub leg_count: usize,
    pub combined_prob: f64,
    pub correlation_penalty: f64,
    pub adjusted_prob: f64,
    pub fair_odds: f64,
    pub implied_odds: f64,
    pub edge_pct: f64,
    pub confidence: Confidence,
    pub league: String,
    #[serde(with = "time::serde::rfc3339")]
    pub window_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub window_end: OffsetDateTime,
    pub status: ParlayStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub synced_at: OffsetDateTime,
    pub legs: Vec<NewLeg>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistedLeg {
    pub parlay_id: i64,
    #[serde(flatten)]
    pub leg: NewLeg,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistedParlay {
    pub id: i64,
    pub match_id: String,
    pub fingerprint: Fingerprint,
    pub parlay_type: String,
    pub leg_count: usize,
    pub combined_prob: f64,
    pub correlation_penalty: f64,
    pub adjusted_prob: f64,
    pub fair_odds: f64,
    pub implied_odds: f64,
    pub edge_pct: f64,
    pub confidence: Confidence,
    pub league: String,
    #[serde(with = "time::serde::rfc3339")]
    pub window_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub window_end: OffsetDateTime,
    pub status: ParlayStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub synced_at: OffsetDateTime,
    pub legs: Vec<PersistedLeg>,
}

impl PersistedParlay {
    pub fn from_new(id: i64, parlay: NewParlay) -> Self {
        Self {
            id,
            match_id: parlay.match_id,
            fingerprint: parlay.fingerprint,
            parlay_type: parlay.parlay_type,
            leg_count: parlay.leg_count,
            combined_prob: parlay.combined_prob,
            correlation_penalty: parlay.correlation_penalty,
            adjusted_prob: parlay.adjusted_prob,
            fair_odds: parlay.fair_odds,
            implied_odds: parlay.implied_odds,
            edge_pct: parlay.edge_pct,
            confidence: parlay.confidence,
            league: parlay.league,
            window_start: parlay.window_start,
            window_end: parlay.window_end,
            status: parlay.status,
            synced_at: parlay.synced_at,
            legs: parlay
                .legs
                .into_iter()
                .map(|leg| PersistedLeg { parlay_id: id, leg })
                .collect(),
        }
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.legs.iter().map(|leg| leg.leg.outcome).collect()
    }

    /// Fingerprint rebuilt from the stored legs rather than the stored column.
    pub fn leg_fingerprint(&self) -> Fingerprint {
        Fingerprint::from_outcomes(self.outcomes())
    }

    /// Same outcome membership and same leg count, regardless of order.
    pub fn has_same_legs(&self, fingerprint: &Fingerprint, leg_count: usize) -> bool {
        self.legs.len() == leg_count && &self.leg_fingerprint() == fingerprint
    }

    pub fn shares_outcome_with(&self, outcomes: &[Outcome]) -> bool {
        self.legs
            .iter()
            .any(|leg| outcomes.contains(&leg.leg.outcome))
    }
}
