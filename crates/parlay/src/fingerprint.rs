use std::fmt;

use serde::{Deserialize, Serialize};

use crate::market::Outcome;

/// Identity of a parlay's composition within one match: the sorted outcome
/// codes joined by `|`. Leg order does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        let mut codes: Vec<&'static str> = outcomes.into_iter().map(Outcome::code).collect();
        codes.sort_unstable();
        codes.dedup();
        Self(codes.join("|"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Fingerprint {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Fingerprint;
    use crate::market::Outcome;

    #[test]
    fn ignores_leg_order() {
        let forward = Fingerprint::from_outcomes([Outcome::DnbHome, Outcome::Under35]);
        let reverse = Fingerprint::from_outcomes([Outcome::Under35, Outcome::DnbHome]);

        assert_eq!(forward, reverse);
        assert_eq!(forward.as_str(), "DNB_HOME|TOTALS_UNDER_3_5");
    }

    #[test]
    fn distinguishes_leg_content() {
        let pair = Fingerprint::from_outcomes([Outcome::DnbHome, Outcome::Under35]);
        let triple =
            Fingerprint::from_outcomes([Outcome::DnbHome, Outcome::Under35, Outcome::BttsNo]);

        assert_ne!(pair, triple);
    }
}
