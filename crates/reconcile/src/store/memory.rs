use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use parlay::{constants::SINGLE_GAME_PARLAY_TYPE, Outcome};

use super::{MatchRecord, NewParlay, ParlayStore, PersistedParlay, StoreError};

#[derive(Debug, Default)]
struct MemoryState {
    matches: HashMap<String, MatchRecord>,
    parlays: Vec<PersistedParlay>,
    next_parlay_id: i64,
}

/// Process-local store. One lock covers the whole state, so a parlay and its
/// legs always land together.
#[derive(Debug, Default)]
pub struct InMemoryParlayStore {
    state: Mutex<MemoryState>,
}

impl InMemoryParlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_match(&self, record: MatchRecord) {
        self.lock().matches.insert(record.id.clone(), record);
    }

    pub fn parlays(&self) -> Vec<PersistedParlay> {
        self.lock().parlays.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ParlayStore for InMemoryParlayStore {
    async fn find_match(&self, match_id: &str) -> Result<Option<MatchRecord>, StoreError> {
        Ok(self.lock().matches.get(match_id).cloned())
    }

    async fn find_single_game_parlays(
        &self,
        match_id: &str,
        outcomes: &[Outcome],
    ) -> Result<Vec<PersistedParlay>, StoreError> {
        Ok(self
            .lock()
            .parlays
            .iter()
            .filter(|parlay| {
                parlay.match_id == match_id
                    && parlay.parlay_type == SINGLE_GAME_PARLAY_TYPE
                    && parlay.shares_outcome_with(outcomes)
            })
            .cloned()
            .collect())
    }

    async fn create_parlay(&self, parlay: NewParlay) -> Result<PersistedParlay, StoreError> {
        let mut state = self.lock();
        let duplicate = state.parlays.iter().any(|existing| {
            existing.match_id == parlay.match_id && existing.fingerprint == parlay.fingerprint
        });
        if duplicate {
            return Err(StoreError::Conflict {
                match_id: parlay.match_id,
                fingerprint: parlay.fingerprint,
            });
        }

        state.next_parlay_id += 1;
        let persisted = PersistedParlay::from_new(state.next_parlay_id, parlay);
        state.parlays.push(persisted.clone());
        Ok(persisted)
    }
}
