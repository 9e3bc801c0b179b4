//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Merge requests (outcome, failing stage, duration)
//! - Merge attempts per strategy
//! - Source downloads

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Pipeline Metrics
// =============================================================================

/// Merge requests by result ("success", "failed", "rejected").
pub static MERGE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("reelmerge_merge_requests_total", "Total merge requests run"),
        &["result"],
    )
    .unwrap()
});

/// Failed merge requests by the stage that failed.
pub static MERGE_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "reelmerge_merge_failures_total",
            "Failed merge requests by stage",
        ),
        &["stage"],
    )
    .unwrap()
});

/// Time spent in each pipeline stage.
pub static STAGE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "reelmerge_stage_duration_seconds",
            "Duration of each pipeline stage",
        )
        .buckets(vec![
            0.01, 0.1, 0.5, 1.0, 5.0, 15.0, 30.0, 60.0, 300.0, 900.0, 1800.0,
        ]),
        &["stage"],
    )
    .unwrap()
});

// =============================================================================
// Merge Executor Metrics
// =============================================================================

/// ffmpeg runs by strategy and result.
pub static MERGE_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "reelmerge_merge_attempts_total",
            "ffmpeg concat attempts by strategy",
        ),
        &["strategy", "result"], // "stream_copy" | "reencode", "success" | "failed"
    )
    .unwrap()
});

// =============================================================================
// Fetcher Metrics
// =============================================================================

/// Bytes downloaded from sources.
pub static DOWNLOADED_BYTES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "reelmerge_downloaded_bytes_total",
        "Total bytes downloaded from sources",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(MERGE_REQUESTS.clone()),
        Box::new(MERGE_FAILURES.clone()),
        Box::new(STAGE_DURATION.clone()),
        Box::new(MERGE_ATTEMPTS.clone()),
        Box::new(DOWNLOADED_BYTES.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;

    #[test]
    fn test_all_metrics_register() {
        let registry = Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        MERGE_REQUESTS.with_label_values(&["success"]).inc();
        let families = registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "reelmerge_merge_requests_total"));
    }
}
