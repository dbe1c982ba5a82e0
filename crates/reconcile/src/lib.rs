pub mod engine;
pub mod http_source;
pub mod locks;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod store;

pub use engine::{StopSignal, SyncEngine, SyncError, SyncOptions};
pub use http_source::HttpMarketSource;
pub use pipeline::{run_once, RunError, RunSummary};
pub use report::{LatencyPercentiles, SyncReport, SyncStats};
pub use source::{fetch_snapshots, MarketSource, SourceError, StaticMarketSource};
pub use store::{InMemoryParlayStore, ParlayStore, SqliteParlayStore, StoreError};

pub fn module_ready() -> bool {
    true
}
