//! Fixed generation thresholds. These are product constants, not runtime
//! configuration.

/// Minimum probability for a leg to be considered safe enough to combine.
pub const SAFE_LEG_THRESHOLD: f64 = 0.55;

/// Legs kept per match before combining, highest probability first.
pub const MAX_LEGS_PER_MATCH: usize = 3;

/// Leg counts a single-game parlay may have. Pairs and triples only.
pub const MIN_PARLAY_LEGS: usize = 2;
pub const MAX_PARLAY_LEGS: usize = 3;

pub const TWO_LEG_CORRELATION_PENALTY: f64 = 0.85;
pub const THREE_LEG_CORRELATION_PENALTY: f64 = 0.80;

pub const TWO_LEG_HIGH_CUTOFF: f64 = 0.30;
pub const TWO_LEG_MEDIUM_CUTOFF: f64 = 0.20;
pub const THREE_LEG_MEDIUM_CUTOFF: f64 = 0.20;

pub const SINGLE_GAME_PARLAY_TYPE: &str = "single_game";

/// Team name used upstream before a fixture's participants are known.
pub const PLACEHOLDER_TEAM: &str = "TBD";

pub fn correlation_penalty(leg_count: usize) -> Option<f64> {
    match leg_count {
        MIN_PARLAY_LEGS => Some(TWO_LEG_CORRELATION_PENALTY),
        MAX_PARLAY_LEGS => Some(THREE_LEG_CORRELATION_PENALTY),
        _ => None,
    }
}

/// True when a team name is missing in substance: blank or the upstream placeholder.
pub fn is_placeholder_team(name: &str) -> bool {
    let name = name.trim();
    name.is_empty() || name.eq_ignore_ascii_case(PLACEHOLDER_TEAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn penalty_is_defined_only_for_two_and_three_legs() {
        assert_eq!(correlation_penalty(1), None);
        assert_eq!(correlation_penalty(2), Some(0.85));
        assert_eq!(correlation_penalty(3), Some(0.80));
        assert_eq!(correlation_penalty(4), None);
    }

    #[test]
    fn every_supported_leg_count_has_a_penalty() {
        for leg_count in MIN_PARLAY_LEGS..=MAX_PARLAY_LEGS {
            assert!(correlation_penalty(leg_count).is_some(), "{leg_count} legs");
        }
        assert_eq!(correlation_penalty(MIN_PARLAY_LEGS - 1), None);
        assert_eq!(correlation_penalty(MAX_PARLAY_LEGS + 1), None);
    }

    #[test]
    fn placeholder_detection_ignores_case_and_whitespace() {
        assert!(is_placeholder_team("TBD"));
        assert!(is_placeholder_team(" tbd "));
        assert!(is_placeholder_team("   "));
        assert!(!is_placeholder_team("Arsenal"));
    }
}
