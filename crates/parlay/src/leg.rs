use serde::Serialize;

use crate::market::Outcome;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub outcome: Outcome,
    pub probability: f64,
    pub description: String,
}

impl Leg {
    pub fn new(outcome: Outcome, probability: f64, description: impl Into<String>) -> Self {
        Self {
            outcome,
            probability,
            description: description.into(),
        }
    }

    pub fn contradicts(&self, other: &Leg) -> bool {
        self.outcome.excludes(other.outcome)
    }
}
