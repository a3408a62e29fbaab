//! Periodic status-code aggregation
//!
//! Counts responses per status code and hands back a summary snapshot every
//! fixed number of logged requests. Actix runs multiple parallel worker
//! threads, so the counters sit behind a mutex; each increment is a single
//! short critical section on the request path.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Emit one summary after this many logged requests
const FLUSH_INTERVAL: u64 = 100;

#[derive(Debug, Default)]
struct CounterState {
    counts: HashMap<u16, u64>,
    total: u64,
}

/// Process-wide status-code counters with periodic flush
///
/// Cheap to clone; all clones share the same counters. The total request
/// counter is monotonically non-decreasing for the process lifetime; only
/// the per-status map resets at each flush.
#[derive(Debug, Clone, Default)]
pub struct StatusAggregator {
    inner: Arc<Mutex<CounterState>>,
}

impl StatusAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one logged response
    ///
    /// Returns `Some(snapshot)` exactly when the running total reaches a
    /// multiple of the flush interval; the per-status map is cleared at that
    /// point and the snapshot becomes the periodic summary record.
    pub fn record(&self, status: u16) -> Option<HashMap<u16, u64>> {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        state.total += 1;
        *state.counts.entry(status).or_insert(0) += 1;

        if state.total % FLUSH_INTERVAL == 0 {
            Some(std::mem::take(&mut state.counts))
        } else {
            None
        }
    }

    /// Total logged responses since process start (never resets)
    pub fn total(&self) -> u64 {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_summary_before_interval() {
        let agg = StatusAggregator::new();
        for _ in 0..99 {
            assert!(agg.record(200).is_none());
        }
        assert_eq!(agg.total(), 99);
    }

    #[test]
    fn test_summary_at_interval_and_reset() {
        let agg = StatusAggregator::new();
        for _ in 0..97 {
            agg.record(200);
        }
        for _ in 0..2 {
            agg.record(404);
        }

        let summary = agg.record(500).expect("summary due at 100th request");
        assert_eq!(summary.get(&200), Some(&97));
        assert_eq!(summary.get(&404), Some(&2));
        assert_eq!(summary.get(&500), Some(&1));

        // Counters reset, total keeps running
        assert_eq!(agg.total(), 100);
        assert!(agg.record(200).is_none());
        assert_eq!(agg.total(), 101);

        // Fresh window only contains the 101st request
        for _ in 0..98 {
            agg.record(200);
        }
        let summary = agg.record(200).expect("summary due at 200th request");
        assert_eq!(summary.get(&200), Some(&100));
        assert!(summary.get(&404).is_none());
    }

    #[test]
    fn test_clones_share_counters() {
        let agg = StatusAggregator::new();
        let other = agg.clone();
        agg.record(200);
        other.record(200);
        assert_eq!(agg.total(), 2);
    }

    #[test]
    fn test_summary_serializes_as_status_map() {
        let agg = StatusAggregator::new();
        for _ in 0..99 {
            agg.record(200);
        }
        let summary = agg.record(404).expect("summary due");
        let json = serde_json::to_value(&summary).expect("serializable");
        assert_eq!(json["200"], 99);
        assert_eq!(json["404"], 1);
    }
}
