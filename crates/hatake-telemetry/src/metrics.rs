//! Prometheus metrics for the marketplace sync engine.
//!
//! Covers:
//! - Per-entry sync outcomes (applied / skipped_stale / rejected)
//! - Rejection reasons
//! - Bulk batch sizes
//! - Store failures by kind
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. If registration
//! fails, it indicates a fatal configuration error (e.g., duplicate
//! metric names) that should cause an immediate crash at startup
//! rather than silent failure. These panics only occur during static
//! initialization, never at runtime.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_histogram, Counter, CounterVec, Histogram,
};

/// Total per-entry sync outcomes.
/// Labels: outcome (applied/skipped_stale/rejected)
pub static SYNC_OUTCOMES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "hatake_sync_outcomes_total",
        "Total per-entry sync outcomes",
        &["outcome"]
    )
    .unwrap()
});

/// Total sync rejections by reason.
/// Labels: reason (invalid_amount/unsupported_currency/rate_unavailable/
/// malformed_entry/store_unavailable/store_timeout)
pub static SYNC_REJECTED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "hatake_sync_rejected_total",
        "Total sync rejections by reason",
        &["reason"]
    )
    .unwrap()
});

/// Distribution of bulk batch sizes after in-batch deduplication.
pub static BULK_BATCH_SIZE: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "hatake_bulk_batch_size",
        "Entries per bulk operation after deduplication",
        vec![1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0]
    )
    .unwrap()
});

/// Total index store failures observed by the synchronizer.
/// Labels: kind (timeout/unavailable)
pub static STORE_FAILURES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "hatake_store_failures_total",
        "Total index store failures by kind",
        &["kind"]
    )
    .unwrap()
});

/// Total orphaned listings withdrawn by reconciliation.
pub static RECONCILE_WITHDRAWN_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "hatake_reconcile_withdrawn_total",
        "Total orphaned listings withdrawn by reconciliation"
    )
    .unwrap()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_register_once() {
        // Touching each Lazy twice must not panic on double registration.
        for _ in 0..2 {
            SYNC_OUTCOMES_TOTAL.with_label_values(&["applied"]).inc();
            SYNC_REJECTED_TOTAL
                .with_label_values(&["malformed_entry"])
                .inc();
            BULK_BATCH_SIZE.observe(10.0);
            STORE_FAILURES_TOTAL.with_label_values(&["timeout"]).inc();
            RECONCILE_WITHDRAWN_TOTAL.inc();
        }
        assert!(
            SYNC_OUTCOMES_TOTAL
                .with_label_values(&["applied"])
                .get()
                >= 2.0
        );
    }
}
