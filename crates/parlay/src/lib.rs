pub mod candidate;
pub mod combine;
pub mod compose;
pub mod confidence;
pub mod constants;
pub mod extract;
pub mod fingerprint;
pub mod leg;
pub mod market;

pub use candidate::{generate_candidates, generate_for_match, rank_candidates, CandidateParlay};
pub use combine::{cap_legs, combinations, is_compatible};
pub use compose::{ComposeError, Composition};
pub use confidence::{classify, Confidence};
pub use extract::extract_legs;
pub use fingerprint::Fingerprint;
pub use leg::Leg;
pub use market::{
    BttsMarket, DnbMarket, DoubleChanceMarket, MarketBundle, MarketType, MatchSnapshot,
    MatchSummary, Outcome, TotalsMarket,
};

pub fn module_ready() -> bool {
    true
}
