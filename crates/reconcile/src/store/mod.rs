//! Persistence seam for ground-truth matches and synced parlays.
//!
//! Implementations must enforce one parlay per (match id, fingerprint) and
//! write a parlay together with its legs or not at all.

pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod types;

use async_trait::async_trait;
use parlay::{Fingerprint, Outcome};
use thiserror::Error;

pub use memory::InMemoryParlayStore;
pub use sqlite::SqliteParlayStore;
pub use types::{MatchRecord, NewLeg, NewParlay, ParlayStatus, PersistedLeg, PersistedParlay};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("parlay {fingerprint} already exists for match {match_id}")]
    Conflict {
        match_id: String,
        fingerprint: Fingerprint,
    },
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("stored row is corrupt: {0}")]
    Corrupt(String),
    #[error("store task did not complete: {0}")]
    Join(String),
}

#[async_trait]
pub trait ParlayStore: Send + Sync {
    async fn find_match(&self, match_id: &str) -> Result<Option<MatchRecord>, StoreError>;

    /// Single-game parlays already stored for `match_id` sharing at least one
    /// of `outcomes`.
    async fn find_single_game_parlays(
        &self,
        match_id: &str,
        outcomes: &[Outcome],
    ) -> Result<Vec<PersistedParlay>, StoreError>;

    /// Writes the parlay and all of its legs atomically. Returns
    /// `StoreError::Conflict` when the (match id, fingerprint) pair exists.
    async fn create_parlay(&self, parlay: NewParlay) -> Result<PersistedParlay, StoreError>;
}
