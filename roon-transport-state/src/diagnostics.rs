//! Counters for zone events the mirror could not apply cleanly
//!
//! The synchronizer never fails on a surprising event; it logs it, applies
//! what it can and bumps one of these counters.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::mirror::ChangeSummary;

/// Live anomaly counters shared by a synchronizer and its clones
#[derive(Debug, Default)]
pub struct MirrorDiagnostics {
    snapshots: AtomicU64,
    deltas: AtomicU64,
    deltas_before_snapshot: AtomicU64,
    removed_unknown_zone: AtomicU64,
    added_existing_zone: AtomicU64,
    changed_unknown_zone: AtomicU64,
    seek_unknown_zone: AtomicU64,
    skipped_records: AtomicU64,
    decode_failures: AtomicU64,
    unknown_events: AtomicU64,
}

/// Point-in-time copy of [`MirrorDiagnostics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticsSnapshot {
    pub snapshots: u64,
    pub deltas: u64,
    pub deltas_before_snapshot: u64,
    pub removed_unknown_zone: u64,
    pub added_existing_zone: u64,
    pub changed_unknown_zone: u64,
    pub seek_unknown_zone: u64,
    pub skipped_records: u64,
    pub decode_failures: u64,
    pub unknown_events: u64,
    /// Events discarded from the subscriber's queue after being applied
    ///
    /// Filled in by [`ZoneSubscription::diagnostics`](crate::ZoneSubscription::diagnostics);
    /// the mirror itself is unaffected, so this is not an anomaly.
    pub dropped_events: u64,
}

impl DiagnosticsSnapshot {
    /// Sum of every anomaly counter
    pub fn anomalies(&self) -> u64 {
        self.deltas_before_snapshot
            + self.removed_unknown_zone
            + self.added_existing_zone
            + self.changed_unknown_zone
            + self.seek_unknown_zone
            + self.skipped_records
            + self.decode_failures
            + self.unknown_events
    }
}

fn bump(counter: &AtomicU64, by: u64) {
    if by > 0 {
        counter.fetch_add(by, Ordering::Relaxed);
    }
}

impl MirrorDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_snapshot(&self) {
        bump(&self.snapshots, 1);
    }

    pub(crate) fn record_delta(&self, summary: &ChangeSummary) {
        bump(&self.deltas, 1);
        bump(&self.removed_unknown_zone, summary.removed_unknown as u64);
        bump(&self.added_existing_zone, summary.added_existing as u64);
        bump(&self.changed_unknown_zone, summary.changed_unknown as u64);
        bump(&self.seek_unknown_zone, summary.seek_unknown as u64);
    }

    pub(crate) fn record_delta_before_snapshot(&self) {
        bump(&self.deltas_before_snapshot, 1);
    }

    pub(crate) fn record_skipped(&self, count: usize) {
        bump(&self.skipped_records, count as u64);
    }

    pub(crate) fn record_decode_failure(&self) {
        bump(&self.decode_failures, 1);
    }

    pub(crate) fn record_unknown_event(&self) {
        bump(&self.unknown_events, 1);
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            snapshots: self.snapshots.load(Ordering::Relaxed),
            deltas: self.deltas.load(Ordering::Relaxed),
            deltas_before_snapshot: self.deltas_before_snapshot.load(Ordering::Relaxed),
            removed_unknown_zone: self.removed_unknown_zone.load(Ordering::Relaxed),
            added_existing_zone: self.added_existing_zone.load(Ordering::Relaxed),
            changed_unknown_zone: self.changed_unknown_zone.load(Ordering::Relaxed),
            seek_unknown_zone: self.seek_unknown_zone.load(Ordering::Relaxed),
            skipped_records: self.skipped_records.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            unknown_events: self.unknown_events.load(Ordering::Relaxed),
            dropped_events: 0,
        }
    }
}
