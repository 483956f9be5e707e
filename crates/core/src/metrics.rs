//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Title generation (provider calls, vote outcomes)
//! - Title cache (lookups, buckets stored)
//! - Link projection (files written)

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

/// Total completion requests sent to the title provider.
pub static PROVIDER_CALLS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "linklater_provider_calls_total",
        "Total title provider completions requested",
    )
    .unwrap()
});

/// Title generation outcomes per path.
pub static TITLE_GENERATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "linklater_title_generations_total",
            "Title generation outcomes",
        ),
        &["result"], // "generated", "degraded"
    )
    .unwrap()
});

/// Title cache lookups by result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("linklater_cache_lookups_total", "Title cache lookups"),
        &["result"], // "hit", "miss"
    )
    .unwrap()
});

/// Title buckets durably stored.
pub static BUCKETS_STORED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "linklater_buckets_stored_total",
        "Title buckets durably stored",
    )
    .unwrap()
});

/// Stream link files written to disk.
pub static LINKS_WRITTEN: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "linklater_links_written_total",
        "Stream link files written to disk",
    )
    .unwrap()
});

/// Register every metric with the given registry.
pub fn register_all(registry: &Registry) -> Result<(), prometheus::Error> {
    registry.register(Box::new(PROVIDER_CALLS.clone()))?;
    registry.register(Box::new(TITLE_GENERATIONS.clone()))?;
    registry.register(Box::new(CACHE_LOOKUPS.clone()))?;
    registry.register(Box::new(BUCKETS_STORED.clone()))?;
    registry.register(Box::new(LINKS_WRITTEN.clone()))?;
    Ok(())
}
