use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    combine::combinations,
    compose::Composition,
    confidence::{classify, Confidence},
    extract::extract_legs,
    fingerprint::Fingerprint,
    leg::Leg,
    market::{MatchSnapshot, Outcome},
};

/// A priced multi-leg bet on a single match, produced by one generation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateParlay {
    pub match_id: String,
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    #[serde(with = "time::serde::rfc3339")]
    pub kickoff: OffsetDateTime,
    pub legs: Vec<Leg>,
    pub composition: Composition,
    pub confidence: Confidence,
}

impl CandidateParlay {
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::from_outcomes(self.outcomes())
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.legs.iter().map(|leg| leg.outcome).collect()
    }

    pub fn combined_prob(&self) -> f64 {
        self.composition.combined_prob
    }
}

pub fn generate_for_match(snapshot: &MatchSnapshot) -> Vec<CandidateParlay> {
    let summary = &snapshot.summary;
    let legs = extract_legs(snapshot);

    combinations(&legs)
        .into_iter()
        .filter_map(|legs| {
            // Combinations are always 2 or 3 legs of safe probabilities.
            let composition = Composition::from_legs(&legs).ok()?;
            let confidence = classify(composition.combined_prob, legs.len());
            Some(CandidateParlay {
                match_id: summary.id.clone(),
                home_team: summary.home_team.clone(),
                away_team: summary.away_team.clone(),
                league: summary.league.clone(),
                kickoff: summary.kickoff,
                legs,
                composition,
                confidence,
            })
        })
        .collect()
}

/// Orders candidates by descending pre-correlation probability. Ties keep
/// generation order.
pub fn rank_candidates(mut candidates: Vec<CandidateParlay>) -> Vec<CandidateParlay> {
    candidates.sort_by(|left, right| right.combined_prob().total_cmp(&left.combined_prob()));
    candidates
}

pub fn generate_candidates(snapshots: &[MatchSnapshot]) -> Vec<CandidateParlay> {
    let candidates = snapshots.iter().flat_map(generate_for_match).collect();
    rank_candidates(candidates)
}
