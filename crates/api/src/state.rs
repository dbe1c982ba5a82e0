use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use reconcile::{MarketSource, StopSignal, SyncEngine};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StartRunError {
    RunIdOverflow,
}

#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn MarketSource>,
    engine: Arc<SyncEngine>,
    admin_token: Option<Arc<str>>,
    stop: StopSignal,
    next_run_id: Arc<AtomicU64>,
}

impl AppState {
    /// A blank or absent admin token leaves the trigger locked for everyone.
    pub fn new(
        source: Arc<dyn MarketSource>,
        engine: Arc<SyncEngine>,
        admin_token: Option<String>,
    ) -> Self {
        Self {
            source,
            engine,
            admin_token: admin_token
                .filter(|token| !token.trim().is_empty())
                .map(Arc::from),
            stop: StopSignal::new(),
            next_run_id: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn source(&self) -> &dyn MarketSource {
        self.source.as_ref()
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref()
    }

    /// Shared with every run; tripping it makes in-flight runs stop early.
    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    pub fn start_run(&self) -> Result<u64, StartRunError> {
        let previous = self
            .next_run_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                current.checked_add(1)
            })
            .map_err(|_| StartRunError::RunIdOverflow)?;

        Ok(previous + 1)
    }
}
