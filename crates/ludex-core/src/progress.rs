//! Progress reporting for harvest and load operations.
//!
//! Trait-based so that consumers can route events to logging, UI updates,
//! or metrics without coupling the core logic to any of them.

use crate::stats::{HarvestStats, LoadStats};

/// Events emitted during harvesting and index loading.
#[derive(Debug, Clone)]
pub enum HarvestEvent<'a> {
    /// The remote reported its total record count.
    CountDiscovered {
        /// Total records behind the harvest filter.
        count: u64,
    },

    /// A batch window is starting.
    WindowStarted {
        /// Zero-based window index.
        window: u64,
        /// Exclusive id lower bound for every page in this window.
        after_id: i64,
    },

    /// One page request in the current window failed.
    PageFailed {
        /// Zero-based window index.
        window: u64,
        /// Window-relative offset of the failed page.
        offset: u64,
        /// Failure description.
        reason: &'a str,
    },

    /// A window completed with at least one record.
    WindowCompleted {
        /// Zero-based window index.
        window: u64,
        /// Raw records returned by the window's succeeding pages.
        fetched: usize,
        /// Records dropped during normalization.
        dropped: usize,
        /// Cursor position after this window.
        max_seen_id: i64,
    },

    /// A window returned zero records; the harvest ends here.
    WindowEmpty {
        /// Zero-based window index.
        window: u64,
    },

    /// The harvest finished.
    HarvestCompleted {
        /// Final harvest counters.
        stats: &'a HarvestStats,
        /// Distinct keys in the assembled dataset.
        dataset_len: usize,
    },

    /// Index schema creation failed and will be retried.
    SchemaRetry {
        /// Attempts made so far.
        attempt: u32,
        /// Failure description.
        reason: &'a str,
    },

    /// The index load is starting.
    LoadStarted {
        /// Documents about to be written.
        documents: usize,
    },

    /// A single document upsert failed; the load continues.
    DocumentFailed {
        /// Key of the failed document.
        key: &'a str,
        /// Failure description.
        reason: &'a str,
    },

    /// The index load finished.
    LoadCompleted {
        /// Final load counters.
        stats: &'a LoadStats,
    },
}

/// Trait for reporting harvest progress.
///
/// The default implementation does nothing (silent mode), which is
/// appropriate for library usage where the caller doesn't need progress
/// updates.
pub trait ProgressReporter: Send + Sync {
    /// Called when a harvest or load event occurs.
    fn report(&self, event: HarvestEvent<'_>) {
        let _ = event;
    }
}

/// A no-op reporter that ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

/// A reporter that logs events using the `tracing` crate.
///
/// Suitable for CLI runs that want structured logging on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: HarvestEvent<'_>) {
        use tracing::{error, info, warn};

        match event {
            HarvestEvent::CountDiscovered { count } => {
                info!("Remote reports {} record(s)", count);
            }
            HarvestEvent::WindowStarted { window, after_id } => {
                info!("[Window {}] fetching records with id > {}", window, after_id);
            }
            HarvestEvent::PageFailed {
                window,
                offset,
                reason,
            } => {
                warn!("[Window {}] page at offset {} failed: {}", window, offset, reason);
            }
            HarvestEvent::WindowCompleted {
                window,
                fetched,
                dropped,
                max_seen_id,
            } => {
                info!(
                    "[Window {}] {} record(s) fetched, {} dropped, cursor at {}",
                    window, fetched, dropped, max_seen_id
                );
            }
            HarvestEvent::WindowEmpty { window } => {
                info!("[Window {}] empty, no more data", window);
            }
            HarvestEvent::HarvestCompleted { stats, dataset_len } => {
                info!(
                    "Harvest complete: {} record(s) over {} window(s) ({} dropped, {} failed page(s), {} distinct key(s))",
                    stats.fetched, stats.windows, stats.dropped, stats.failed_pages, dataset_len
                );
            }
            HarvestEvent::SchemaRetry { attempt, reason } => {
                warn!(
                    "Index schema creation failed (attempt {}), retrying: {}",
                    attempt, reason
                );
            }
            HarvestEvent::LoadStarted { documents } => {
                info!("Loading {} document(s) into the index", documents);
            }
            HarvestEvent::DocumentFailed { key, reason } => {
                error!("Failed to write document {}: {}", key, reason);
            }
            HarvestEvent::LoadCompleted { stats } => {
                info!(
                    "Load complete: {} written, {} failed",
                    stats.written, stats.failed
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_reporter_does_nothing() {
        let reporter = SilentReporter;
        reporter.report(HarvestEvent::CountDiscovered { count: 5 });
    }

    #[test]
    fn test_tracing_reporter_handles_all_events() {
        let reporter = TracingReporter;

        reporter.report(HarvestEvent::CountDiscovered { count: 100 });
        reporter.report(HarvestEvent::WindowStarted {
            window: 0,
            after_id: -1,
        });
        reporter.report(HarvestEvent::PageFailed {
            window: 0,
            offset: 500,
            reason: "connection reset",
        });
        reporter.report(HarvestEvent::WindowCompleted {
            window: 0,
            fetched: 90,
            dropped: 2,
            max_seen_id: 4999,
        });
        reporter.report(HarvestEvent::WindowEmpty { window: 1 });

        let stats = HarvestStats::default();
        reporter.report(HarvestEvent::HarvestCompleted {
            stats: &stats,
            dataset_len: 0,
        });

        reporter.report(HarvestEvent::SchemaRetry {
            attempt: 1,
            reason: "backend unavailable",
        });
        reporter.report(HarvestEvent::LoadStarted { documents: 10 });
        reporter.report(HarvestEvent::DocumentFailed {
            key: "doom",
            reason: "write refused",
        });

        let load_stats = LoadStats::default();
        reporter.report(HarvestEvent::LoadCompleted { stats: &load_stats });
    }
}
