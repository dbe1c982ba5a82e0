use serde::Serialize;
use thiserror::Error;

use crate::{
    constants::{correlation_penalty, MAX_PARLAY_LEGS, MIN_PARLAY_LEGS},
    leg::Leg,
};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ComposeError {
    #[error("parlays need {MIN_PARLAY_LEGS} to {MAX_PARLAY_LEGS} legs, got {0}")]
    UnsupportedLegCount(usize),
    #[error("leg probability {0} is outside (0, 1]")]
    InvalidProbability(f64),
}

/// Joint pricing of a set of legs from one match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Composition {
    pub leg_count: usize,
    pub combined_prob: f64,
    pub fair_odds: f64,
    pub correlation_penalty: f64,
    pub adjusted_prob: f64,
    pub implied_odds: f64,
    pub edge_pct: f64,
}

impl Composition {
    pub fn from_legs(legs: &[Leg]) -> Result<Self, ComposeError> {
        let probabilities: Vec<f64> = legs.iter().map(|leg| leg.probability).collect();
        Self::from_probabilities(&probabilities)
    }

    pub fn from_probabilities(probabilities: &[f64]) -> Result<Self, ComposeError> {
        let correlation_penalty = correlation_penalty(probabilities.len())
            .ok_or(ComposeError::UnsupportedLegCount(probabilities.len()))?;
        if let Some(bad) = probabilities
            .iter()
            .copied()
            .find(|p| !p.is_finite() || *p <= 0.0 || *p > 1.0)
        {
            return Err(ComposeError::InvalidProbability(bad));
        }

        let combined_prob: f64 = probabilities.iter().product();
        let fair_odds = 1.0 / combined_prob;
        let adjusted_prob = combined_prob * correlation_penalty;
        let implied_odds = 1.0 / adjusted_prob;
        let edge_pct = (implied_odds - fair_odds) / fair_odds * 100.0;

        Ok(Self {
            leg_count: probabilities.len(),
            combined_prob,
            fair_odds,
            correlation_penalty,
            adjusted_prob,
            implied_odds,
            edge_pct,
        })
    }
}
