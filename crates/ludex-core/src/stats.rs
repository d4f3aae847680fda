//! Harvest and load statistics.
//!
//! Plain counters: the dataset and both stat blocks are mutated only by
//! the single coordinating task between windows, never concurrently.

/// Counters accumulated over one harvest run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestStats {
    /// Total record count the remote reported at harvest start.
    pub total_reported: u64,
    /// Batch windows executed, including a terminal empty window.
    pub windows: u64,
    /// Raw records returned by succeeding pages.
    pub fetched: u64,
    /// Records dropped during normalization (no usable key or name).
    pub dropped: u64,
    /// Page requests that failed; siblings in the window still count.
    pub failed_pages: u64,
}

impl HarvestStats {
    /// Records that survived normalization.
    pub fn normalized(&self) -> u64 {
        self.fetched - self.dropped
    }
}

/// Counters accumulated over one index load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Attempts it took to ensure the index schema.
    pub schema_attempts: u32,
    /// Documents written successfully.
    pub written: u64,
    /// Document writes that failed; the load continued past them.
    pub failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_is_fetched_minus_dropped() {
        let stats = HarvestStats {
            fetched: 10,
            dropped: 3,
            ..HarvestStats::default()
        };
        assert_eq!(stats.normalized(), 7);
    }
}
