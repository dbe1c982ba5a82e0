use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_PARLAY_LEGS, THREE_LEG_MEDIUM_CUTOFF, TWO_LEG_HIGH_CUTOFF, TWO_LEG_MEDIUM_CUTOFF,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Buckets a parlay by its pre-correlation probability. Three-leg parlays
/// top out at medium.
pub fn classify(combined_prob: f64, leg_count: usize) -> Confidence {
    if leg_count >= MAX_PARLAY_LEGS {
        return if combined_prob >= THREE_LEG_MEDIUM_CUTOFF {
            Confidence::Medium
        } else {
            Confidence::Low
        };
    }

    if combined_prob >= TWO_LEG_HIGH_CUTOFF {
        Confidence::High
    } else if combined_prob >= TWO_LEG_MEDIUM_CUTOFF {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}
