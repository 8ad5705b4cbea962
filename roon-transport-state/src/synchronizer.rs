//! Zone synchronizer: keeps a [`ZoneMirror`] in step with a zones subscription
//!
//! The synchronizer owns the mirror behind a shared lock. Each event is
//! applied under one write lock, so readers see the mirror either before or
//! after an event, never halfway through it. Lookups hand out clones.

use std::sync::Arc;

use moo_client::ResponseTag;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, trace, warn};

use roon_transport_api::{IntoTarget, Zone, ZoneId};

use crate::decoder::{decode_zone_event, DecodedZoneEvent, ZoneEvent};
use crate::diagnostics::{DiagnosticsSnapshot, MirrorDiagnostics};
use crate::mirror::ZoneMirror;

/// Shared zone state for one zones subscription
///
/// Cloning is cheap; clones see the same mirror. `None` means no snapshot has
/// arrived yet, or the subscription has been torn down.
#[derive(Debug, Clone, Default)]
pub struct ZoneSynchronizer {
    mirror: Arc<RwLock<Option<ZoneMirror>>>,
    diagnostics: Arc<MirrorDiagnostics>,
}

impl ZoneSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one raw event from the zones topic
    pub fn handle_event(&self, tag: &ResponseTag, body: &Value) {
        match decode_zone_event(tag, body) {
            Ok(decoded) => self.apply(decoded),
            Err(e) => {
                warn!(%tag, error = %e, "dropping undecodable zone event");
                self.diagnostics.record_decode_failure();
            }
        }
    }

    /// Apply one decoded event
    pub fn apply(&self, decoded: DecodedZoneEvent) {
        if decoded.skipped > 0 {
            warn!(skipped = decoded.skipped, "skipped undecodable zone records");
            self.diagnostics.record_skipped(decoded.skipped);
        }

        let mut mirror = self.mirror.write();
        match decoded.event {
            ZoneEvent::Snapshot(zones) => {
                let fresh = ZoneMirror::from_snapshot(zones);
                debug!(zones = fresh.len(), "zone snapshot received");
                *mirror = Some(fresh);
                self.diagnostics.record_snapshot();
            }
            ZoneEvent::Changed(delta) => match mirror.as_mut() {
                Some(current) => {
                    let summary = current.apply_changes(delta);
                    trace!(
                        removed = summary.removed.len(),
                        added = summary.added.len(),
                        changed = summary.changed.len(),
                        seek = summary.seek_updated.len(),
                        "zone delta applied"
                    );
                    if summary.anomalies() > 0 {
                        debug!(
                            removed_unknown = summary.removed_unknown,
                            added_existing = summary.added_existing,
                            changed_unknown = summary.changed_unknown,
                            seek_unknown = summary.seek_unknown,
                            "zone delta did not match the mirror"
                        );
                    }
                    self.diagnostics.record_delta(&summary);
                }
                None => {
                    warn!("zone delta before snapshot ignored");
                    self.diagnostics.record_delta_before_snapshot();
                }
            },
            ZoneEvent::Teardown => {
                debug!("zone subscription torn down, discarding mirror");
                *mirror = None;
            }
            ZoneEvent::Unknown(name) => {
                debug!(tag = %name, "ignoring unknown zone event");
                self.diagnostics.record_unknown_event();
            }
        }
    }

    /// Whether a snapshot is currently held
    pub fn is_subscribed(&self) -> bool {
        self.mirror.read().is_some()
    }

    pub fn zone_by_zone_id(&self, zone_id: &str) -> Option<Zone> {
        self.mirror
            .read()
            .as_ref()
            .and_then(|m| m.zone_by_zone_id(zone_id).cloned())
    }

    /// Find the zone that currently contains an output
    pub fn zone_by_output_id(&self, output_id: &str) -> Option<Zone> {
        self.mirror
            .read()
            .as_ref()
            .and_then(|m| m.zone_by_output_id(output_id).cloned())
    }

    /// Resolve a zone, output, id or reference record to its zone
    pub fn zone_by_ref(&self, target: impl IntoTarget) -> Option<Zone> {
        let target = target.into_target()?;
        self.mirror
            .read()
            .as_ref()
            .and_then(|m| m.zone_by_ref(&target).cloned())
    }

    /// Every mirrored zone; empty without a snapshot
    pub fn zones(&self) -> Vec<Zone> {
        self.with_mirror(|m| m.map(|m| m.zones().cloned().collect()).unwrap_or_default())
    }

    pub fn zone_ids(&self) -> Vec<ZoneId> {
        self.with_mirror(|m| m.map(|m| m.zone_ids().cloned().collect()).unwrap_or_default())
    }

    /// Run `f` against the mirror under the read lock
    pub fn with_mirror<R>(&self, f: impl FnOnce(Option<&ZoneMirror>) -> R) -> R {
        f(self.mirror.read().as_ref())
    }

    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }
}
