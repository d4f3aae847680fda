//! Ludex Core - Domain types, harvest state machine, and index loading.

pub mod config;
pub mod error;
pub mod harvest;
pub mod loader;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod rate;
pub mod stats;
pub mod traits;

pub use config::{HarvestConfig, HttpConfig, IndexConfig, LoadConfig, RetryPolicy};
pub use error::{AppError, IndexError};
pub use harvest::{HarvestOutcome, HarvestService};
pub use loader::{document_fields, IndexLoader, IndexSchema, SchemaField};
pub use models::{CanonicalRecord, Dataset, FetchError, PageQuery, RawRecord};
pub use stats::{HarvestStats, LoadStats};
