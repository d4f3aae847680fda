use std::time::Duration;

/// HTTP client configuration for external API calls.
pub struct HttpConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "Ludex/0.1 (catalog-harvester)".to_string(),
        }
    }
}

/// Pagination and pacing configuration for one harvest run.
///
/// A *window* is the batch of records fetched under one rate-limiter gate;
/// it is split into `window_size / page_size` concurrent page requests.
/// The page size is capped by the remote API (500 records per request);
/// batching several pages per rate-limit epoch amortizes the fixed delay
/// while keeping in-flight concurrency bounded.
#[derive(Clone)]
pub struct HarvestConfig {
    /// Records fetched per rate-limiter gate.
    pub window_size: u64,
    /// Records per page request. Remote cap: 500.
    pub page_size: u64,
    /// Minimum wall-clock spacing between window starts.
    pub min_interval: Duration,
}

impl HarvestConfig {
    /// Number of concurrent page requests per window.
    pub fn pages_per_window(&self) -> u64 {
        self.window_size.div_ceil(self.page_size)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            window_size: 5000,
            page_size: 500,
            min_interval: Duration::from_secs(1),
        }
    }
}

/// Retry policy for index schema creation.
///
/// The harvested dataset is only held in memory; abandoning the load wastes
/// the whole run. `Unbounded` makes that trade-off explicit instead of
/// leaving it to an accidental infinite loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Retry until the operation succeeds.
    Unbounded,
    /// Give up after this many attempts.
    Limited(u32),
}

impl RetryPolicy {
    /// Whether another attempt is allowed after `attempts` have been made.
    pub fn allows(&self, attempts: u32) -> bool {
        match self {
            RetryPolicy::Unbounded => true,
            RetryPolicy::Limited(max) => attempts < *max,
        }
    }
}

/// Index load configuration.
#[derive(Clone)]
pub struct LoadConfig {
    pub retry: RetryPolicy,
    /// Fixed backoff between schema creation attempts.
    pub backoff: Duration,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::Unbounded,
            backoff: Duration::from_secs(3),
        }
    }
}

/// Search index backend location and naming.
#[derive(Clone)]
pub struct IndexConfig {
    pub hostname: String,
    pub port: u16,
    /// Name of the full-text index.
    pub index_name: String,
    /// Document keys are written as `{key_prefix}:{record key}`.
    pub key_prefix: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            hostname: "127.0.0.1".to_string(),
            port: 6379,
            index_name: "games".to_string(),
            key_prefix: "game".to_string(),
        }
    }
}
