//! Cursor-paginated harvest of the remote catalog.
//!
//! The [`HarvestService`] walks the remote dataset in rate-gated batch
//! windows, each split into bounded concurrent page requests. A strictly
//! increasing id cursor keeps re-runs and mid-harvest upstream inserts from
//! duplicating or missing records: previously seen ids are permanently
//! excluded by the `id >` filter rather than re-addressed by a shifting
//! offset.
//!
//! The service is generic over [`CatalogSource`] so that unit tests can
//! drive it with scripted in-memory sources.

use futures::future;

use crate::config::HarvestConfig;
use crate::error::AppError;
use crate::models::{Dataset, FetchError, PageQuery, RawRecord};
use crate::normalize::normalize;
use crate::progress::{HarvestEvent, ProgressReporter, SilentReporter};
use crate::rate::RateLimiter;
use crate::stats::HarvestStats;
use crate::traits::CatalogSource;

/// Sentinel below any valid record id; the first window fetches `id > -1`.
const CURSOR_START: i64 = -1;

/// The assembled dataset together with its harvest counters.
#[derive(Debug, Clone)]
pub struct HarvestOutcome {
    pub dataset: Dataset,
    pub stats: HarvestStats,
}

/// Transient pagination state, owned by one harvest call and never shared.
struct PaginationCursor {
    /// Highest record id seen so far; exclusive lower bound for the next
    /// window. Strictly increases after every non-empty window.
    max_seen_id: i64,
    /// Records addressed so far, counted in whole windows.
    processed: u64,
    /// Total reported by the remote at harvest start.
    total_count: u64,
}

impl PaginationCursor {
    fn new(total_count: u64) -> Self {
        Self {
            max_seen_id: CURSOR_START,
            processed: 0,
            total_count,
        }
    }

    /// Advances past a completed window.
    ///
    /// The `id >` filter guarantees `window_max_id > max_seen_id` from a
    /// well-behaved remote; taking the max guards against regression, and
    /// the `processed` bound terminates the loop regardless.
    fn advance(&mut self, window_max_id: i64, window_size: u64) {
        self.max_seen_id = self.max_seen_id.max(window_max_id);
        self.processed += window_size;
    }

    fn exhausted(&self) -> bool {
        self.processed >= self.total_count
    }
}

/// Service harvesting the full record set from a paginated catalog source.
///
/// # Example
///
/// ```ignore
/// use ludex_core::harvest::HarvestService;
///
/// let service = HarvestService::new(igdb_client);
/// let outcome = service.harvest().await?;
/// println!("harvested {} record(s)", outcome.dataset.len());
/// ```
pub struct HarvestService<S>
where
    S: CatalogSource,
{
    source: S,
    config: HarvestConfig,
}

impl<S> HarvestService<S>
where
    S: CatalogSource,
{
    /// Creates a harvest service with default pagination configuration.
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: HarvestConfig::default(),
        }
    }

    /// Creates a harvest service with custom pagination configuration.
    pub fn with_config(source: S, config: HarvestConfig) -> Self {
        Self { source, config }
    }

    /// Harvests the complete dataset.
    ///
    /// # Errors
    ///
    /// Fails only when the initial count request fails. Page failures are
    /// contained: a window keeps the records of its succeeding pages, and a
    /// window with zero surviving records ends the harvest without error.
    pub async fn harvest(&self) -> Result<HarvestOutcome, AppError> {
        self.harvest_with_progress(&SilentReporter).await
    }

    /// Same as [`harvest`](Self::harvest), but emits progress events
    /// through the provided reporter.
    pub async fn harvest_with_progress<R: ProgressReporter>(
        &self,
        reporter: &R,
    ) -> Result<HarvestOutcome, AppError> {
        let total = self.source.count().await?;
        reporter.report(HarvestEvent::CountDiscovered { count: total });

        let mut dataset = Dataset::new();
        let mut stats = HarvestStats {
            total_reported: total,
            ..HarvestStats::default()
        };

        if total == 0 {
            reporter.report(HarvestEvent::HarvestCompleted {
                stats: &stats,
                dataset_len: 0,
            });
            return Ok(HarvestOutcome { dataset, stats });
        }

        let mut cursor = PaginationCursor::new(total);
        let mut limiter = RateLimiter::new(self.config.min_interval);

        loop {
            let window = stats.windows;
            limiter.acquire().await;
            reporter.report(HarvestEvent::WindowStarted {
                window,
                after_id: cursor.max_seen_id,
            });

            let (records, failures) = self.fetch_window(cursor.max_seen_id).await;
            stats.windows += 1;
            stats.failed_pages += failures.len() as u64;
            for failure in &failures {
                reporter.report(HarvestEvent::PageFailed {
                    window,
                    offset: failure.offset,
                    reason: &failure.reason,
                });
            }

            // The cursor advance is computed from the complete window view:
            // every page has settled by now, and records without an id
            // cannot anchor the next window's filter.
            let Some(window_max_id) = records.iter().filter_map(|r| r.id).max() else {
                reporter.report(HarvestEvent::WindowEmpty { window });
                break;
            };

            let fetched = records.len();
            let mut dropped = 0usize;
            for raw in records {
                match normalize(raw) {
                    Some(record) => dataset.insert(record),
                    None => dropped += 1,
                }
            }
            stats.fetched += fetched as u64;
            stats.dropped += dropped as u64;

            cursor.advance(window_max_id, self.config.window_size);
            reporter.report(HarvestEvent::WindowCompleted {
                window,
                fetched,
                dropped,
                max_seen_id: cursor.max_seen_id,
            });

            if cursor.exhausted() {
                break;
            }
        }

        reporter.report(HarvestEvent::HarvestCompleted {
            stats: &stats,
            dataset_len: dataset.len(),
        });
        Ok(HarvestOutcome { dataset, stats })
    }

    /// Fetches one batch window: all page requests are dispatched before
    /// any is awaited, bounded in flight by `window_size / page_size`.
    ///
    /// A failed page becomes a [`FetchError`] tagged with its offset and
    /// does not abort its siblings. Returned records carry no order
    /// guarantee (pages race).
    async fn fetch_window(&self, after_id: i64) -> (Vec<RawRecord>, Vec<FetchError>) {
        let page_size = self.config.page_size;
        let pages = (0..self.config.pages_per_window()).map(|page| {
            let offset = page * page_size;
            async move {
                self.source
                    .fetch_page(PageQuery {
                        after_id,
                        offset,
                        limit: page_size,
                    })
                    .await
                    .map_err(|e| FetchError {
                        offset,
                        reason: e.to_string(),
                    })
            }
        });

        let mut records = Vec::new();
        let mut failures = Vec::new();
        for result in future::join_all(pages).await {
            match result {
                Ok(mut page) => records.append(&mut page),
                Err(failure) => failures.push(failure),
            }
        }
        (records, failures)
    }
}
