//! Lightweight global metrics for frostview.
//!
//! Thread-safe atomic counters for the read-view subsystem:
//! - open/close lifecycle
//! - activation/deactivation
//! - space/index read views built
//! - upgrade transform applications

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// ----- Lifecycle -----
static READ_VIEWS_OPENED: AtomicU64 = AtomicU64::new(0);
static READ_VIEW_OPEN_FAILURES: AtomicU64 = AtomicU64::new(0);
static READ_VIEWS_CLOSED: AtomicU64 = AtomicU64::new(0);

// ----- Activation -----
static READ_VIEW_ACTIVATIONS: AtomicU64 = AtomicU64::new(0);
static READ_VIEW_ACTIVATION_FAILURES: AtomicU64 = AtomicU64::new(0);
static READ_VIEW_DEACTIVATIONS: AtomicU64 = AtomicU64::new(0);

// ----- Construction -----
static SPACE_READ_VIEWS_BUILT: AtomicU64 = AtomicU64::new(0);
static INDEX_READ_VIEWS_BUILT: AtomicU64 = AtomicU64::new(0);

// ----- Upgrades -----
static UPGRADE_APPLIES: AtomicU64 = AtomicU64::new(0);
static UPGRADE_APPLY_FAILURES: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub read_views_opened: u64,
    pub read_view_open_failures: u64,
    pub read_views_closed: u64,

    pub read_view_activations: u64,
    pub read_view_activation_failures: u64,
    pub read_view_deactivations: u64,

    pub space_read_views_built: u64,
    pub index_read_views_built: u64,

    pub upgrade_applies: u64,
    pub upgrade_apply_failures: u64,
}

impl MetricsSnapshot {
    /// Read views currently alive (opened minus closed).
    pub fn read_views_live(&self) -> u64 {
        self.read_views_opened
            .saturating_sub(self.read_views_closed)
    }
}

/// Collect a consistent-enough snapshot of all counters.
pub fn metrics_snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        read_views_opened: READ_VIEWS_OPENED.load(Ordering::Relaxed),
        read_view_open_failures: READ_VIEW_OPEN_FAILURES.load(Ordering::Relaxed),
        read_views_closed: READ_VIEWS_CLOSED.load(Ordering::Relaxed),
        read_view_activations: READ_VIEW_ACTIVATIONS.load(Ordering::Relaxed),
        read_view_activation_failures: READ_VIEW_ACTIVATION_FAILURES.load(Ordering::Relaxed),
        read_view_deactivations: READ_VIEW_DEACTIVATIONS.load(Ordering::Relaxed),
        space_read_views_built: SPACE_READ_VIEWS_BUILT.load(Ordering::Relaxed),
        index_read_views_built: INDEX_READ_VIEWS_BUILT.load(Ordering::Relaxed),
        upgrade_applies: UPGRADE_APPLIES.load(Ordering::Relaxed),
        upgrade_apply_failures: UPGRADE_APPLY_FAILURES.load(Ordering::Relaxed),
    }
}

/// Snapshot rendered as a JSON object.
pub fn metrics_json() -> String {
    serde_json::to_string(&metrics_snapshot()).unwrap_or_else(|_| "{}".to_string())
}

// ----- Recorders -----
pub fn record_read_view_opened() {
    READ_VIEWS_OPENED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_read_view_open_failure() {
    READ_VIEW_OPEN_FAILURES.fetch_add(1, Ordering::Relaxed);
}
pub fn record_read_view_closed() {
    READ_VIEWS_CLOSED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_read_view_activation() {
    READ_VIEW_ACTIVATIONS.fetch_add(1, Ordering::Relaxed);
}
pub fn record_read_view_activation_failure() {
    READ_VIEW_ACTIVATION_FAILURES.fetch_add(1, Ordering::Relaxed);
}
pub fn record_read_view_deactivation() {
    READ_VIEW_DEACTIVATIONS.fetch_add(1, Ordering::Relaxed);
}
pub fn record_space_read_view() {
    SPACE_READ_VIEWS_BUILT.fetch_add(1, Ordering::Relaxed);
}
pub fn record_index_read_view() {
    INDEX_READ_VIEWS_BUILT.fetch_add(1, Ordering::Relaxed);
}
pub fn record_upgrade_apply() {
    UPGRADE_APPLIES.fetch_add(1, Ordering::Relaxed);
}
pub fn record_upgrade_apply_failure() {
    UPGRADE_APPLY_FAILURES.fetch_add(1, Ordering::Relaxed);
}
