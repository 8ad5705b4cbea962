//! The zone mirror: a local copy of the core's zone state
//!
//! `ZoneMirror` is a plain owned map from zone id to zone record. It knows
//! how to replace itself from a snapshot and how to apply a delta; it knows
//! nothing about subscriptions, locking or logging. Anomalies found while
//! applying a delta are reported back in the [`ChangeSummary`].

use std::collections::HashMap;

use roon_transport_api::{TargetRef, Zone, ZoneId, ZoneSeekChange, ZonesChanged};

/// Local copy of every zone, keyed by zone id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneMirror {
    zones: HashMap<ZoneId, Zone>,
}

/// What a delta did to the mirror
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Zones deleted by `zones_removed`
    pub removed: Vec<ZoneId>,
    /// Zones inserted by `zones_added` or `zones_changed` that were not present
    pub added: Vec<ZoneId>,
    /// Zones replaced by `zones_added` or `zones_changed` that were present
    pub changed: Vec<ZoneId>,
    /// Zones whose seek fields were updated
    pub seek_updated: Vec<ZoneId>,
    /// `zones_removed` entries naming a zone not in the mirror
    pub removed_unknown: usize,
    /// `zones_added` entries for a zone already in the mirror
    pub added_existing: usize,
    /// `zones_changed` entries for a zone not in the mirror
    pub changed_unknown: usize,
    /// `zones_seek_changed` entries for a zone not in the mirror
    pub seek_unknown: usize,
}

impl ChangeSummary {
    /// Whether the delta changed anything
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
            && self.added.is_empty()
            && self.changed.is_empty()
            && self.seek_updated.is_empty()
    }

    /// Number of entries that did not match the mirror's contents
    pub fn anomalies(&self) -> usize {
        self.removed_unknown + self.added_existing + self.changed_unknown + self.seek_unknown
    }
}

impl ZoneMirror {
    /// Create an empty mirror
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mirror from a full snapshot
    ///
    /// If the snapshot repeats a zone id, the last record wins.
    pub fn from_snapshot(zones: impl IntoIterator<Item = Zone>) -> Self {
        Self {
            zones: zones
                .into_iter()
                .map(|zone| (zone.zone_id.clone(), zone))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn contains(&self, zone_id: &str) -> bool {
        self.zones.contains_key(zone_id)
    }

    /// Apply a delta
    ///
    /// Lists are processed in a fixed order: removals, additions, changes,
    /// then seek updates, so a zone removed and re-added in one delta ends up
    /// present, and seek updates see the zones added by the same delta.
    pub fn apply_changes(&mut self, delta: ZonesChanged) -> ChangeSummary {
        let mut summary = ChangeSummary::default();

        for removed in delta.zones_removed.unwrap_or_default() {
            match self.zones.remove(removed.zone_id()) {
                Some(zone) => summary.removed.push(zone.zone_id),
                None => summary.removed_unknown += 1,
            }
        }

        for zone in delta.zones_added.unwrap_or_default() {
            let zone_id = zone.zone_id.clone();
            match self.upsert(zone) {
                Some(_) => {
                    summary.added_existing += 1;
                    summary.changed.push(zone_id);
                }
                None => summary.added.push(zone_id),
            }
        }

        for zone in delta.zones_changed.unwrap_or_default() {
            let zone_id = zone.zone_id.clone();
            match self.upsert(zone) {
                Some(_) => summary.changed.push(zone_id),
                None => {
                    summary.changed_unknown += 1;
                    summary.added.push(zone_id);
                }
            }
        }

        for seek in delta.zones_seek_changed.unwrap_or_default() {
            if self.apply_seek(&seek) {
                summary.seek_updated.push(seek.zone_id);
            } else {
                summary.seek_unknown += 1;
            }
        }

        summary
    }

    /// Apply one seek update; `false` if the zone is not in the mirror
    ///
    /// Only `now_playing.seek_position` (when `now_playing` is present) and
    /// `queue_time_remaining` are written, both taken verbatim from the update.
    pub fn apply_seek(&mut self, seek: &ZoneSeekChange) -> bool {
        let Some(zone) = self.zones.get_mut(&seek.zone_id) else {
            return false;
        };
        if let Some(now_playing) = zone.now_playing.as_mut() {
            now_playing.seek_position = seek.seek_position;
        }
        zone.queue_time_remaining = seek.queue_time_remaining;
        true
    }

    /// Insert or replace a zone record, returning the previous one
    pub fn upsert(&mut self, zone: Zone) -> Option<Zone> {
        self.zones.insert(zone.zone_id.clone(), zone)
    }

    /// Delete a zone record and, with it, its outputs
    pub fn remove(&mut self, zone_id: &str) -> Option<Zone> {
        self.zones.remove(zone_id)
    }

    pub fn zone_by_zone_id(&self, zone_id: &str) -> Option<&Zone> {
        self.zones.get(zone_id)
    }

    /// Find the zone that currently contains an output
    pub fn zone_by_output_id(&self, output_id: &str) -> Option<&Zone> {
        self.zones.values().find(|zone| zone.has_output(output_id))
    }

    /// Resolve a target reference to a zone
    ///
    /// Records resolve by zone id when they carry one, otherwise by output
    /// id. A raw id is tried as a zone id first, then as an output id.
    pub fn zone_by_ref(&self, target: &TargetRef) -> Option<&Zone> {
        match target {
            TargetRef::Id(id) => self
                .zone_by_zone_id(id)
                .or_else(|| self.zone_by_output_id(id)),
            TargetRef::Ref { .. } => {
                if let Some(zone_id) = target.zone_id() {
                    self.zone_by_zone_id(zone_id)
                } else if let Some(output_id) = target.record_output_id() {
                    self.zone_by_output_id(output_id)
                } else {
                    None
                }
            }
        }
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    pub fn zone_ids(&self) -> impl Iterator<Item = &ZoneId> {
        self.zones.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roon_transport_api::{NowPlaying, Output, RemovedZone};

    fn zone(zone_id: &str, output_ids: &[&str]) -> Zone {
        let mut zone = Zone::new(zone_id, format!("Zone {}", zone_id));
        for output_id in output_ids {
            zone.outputs.push(Output::new(*output_id, zone_id, *output_id));
        }
        zone
    }

    fn playing_zone(zone_id: &str, seek_position: f64, length: f64) -> Zone {
        let mut zone = zone(zone_id, &[]);
        zone.now_playing = Some(NowPlaying {
            seek_position: Some(seek_position),
            length: Some(length),
            ..Default::default()
        });
        zone.queue_time_remaining = Some(300.0);
        zone
    }

    #[test]
    fn test_snapshot_keys_by_zone_id() {
        let mirror = ZoneMirror::from_snapshot(vec![zone("z1", &["o1"]), zone("z2", &["o2", "o3"])]);
        assert_eq!(mirror.len(), 2);
        assert_eq!(mirror.zone_by_zone_id("z2").unwrap().outputs.len(), 2);
    }

    #[test]
    fn test_snapshot_last_duplicate_wins() {
        let mut second = zone("z1", &[]);
        second.display_name = "Second".to_string();
        let mirror = ZoneMirror::from_snapshot(vec![zone("z1", &[]), second]);
        assert_eq!(mirror.len(), 1);
        assert_eq!(mirror.zone_by_zone_id("z1").unwrap().display_name, "Second");
    }

    #[test]
    fn test_remove_then_add_in_one_delta_leaves_zone_present() {
        let mut mirror = ZoneMirror::from_snapshot(vec![zone("x", &[])]);
        let summary = mirror.apply_changes(ZonesChanged {
            zones_removed: Some(vec![RemovedZone::from("x")]),
            zones_added: Some(vec![zone("x", &["o9"])]),
            ..Default::default()
        });

        assert!(mirror.contains("x"));
        assert!(mirror.zone_by_output_id("o9").is_some());
        assert_eq!(summary.removed, vec![ZoneId::new("x")]);
        assert_eq!(summary.added, vec![ZoneId::new("x")]);
        assert_eq!(summary.anomalies(), 0);
    }

    #[test]
    fn test_seek_touches_only_seek_fields() {
        let mut mirror = ZoneMirror::from_snapshot(vec![playing_zone("z1", 10.0, 274.5)]);
        let before = mirror.zone_by_zone_id("z1").unwrap().clone();

        let summary = mirror.apply_changes(ZonesChanged {
            zones_seek_changed: Some(vec![ZoneSeekChange {
                zone_id: ZoneId::new("z1"),
                seek_position: Some(42.5),
                queue_time_remaining: Some(7.0),
            }]),
            ..Default::default()
        });

        let after = mirror.zone_by_zone_id("z1").unwrap();
        let now_playing = after.now_playing.as_ref().unwrap();
        assert_eq!(now_playing.seek_position, Some(42.5));
        assert_eq!(now_playing.length, Some(274.5));
        assert_eq!(after.queue_time_remaining, Some(7.0));

        let mut expected = before;
        expected.now_playing.as_mut().unwrap().seek_position = Some(42.5);
        expected.queue_time_remaining = Some(7.0);
        assert_eq!(after, &expected);
        assert_eq!(summary.seek_updated, vec![ZoneId::new("z1")]);
    }

    #[test]
    fn test_seek_without_now_playing_only_sets_queue_time() {
        let mut mirror = ZoneMirror::from_snapshot(vec![zone("z1", &[])]);
        assert!(mirror.apply_seek(&ZoneSeekChange {
            zone_id: ZoneId::new("z1"),
            seek_position: Some(5.0),
            queue_time_remaining: Some(60.0),
        }));

        let zone = mirror.zone_by_zone_id("z1").unwrap();
        assert!(zone.now_playing.is_none());
        assert_eq!(zone.seek_position, None);
        assert_eq!(zone.queue_time_remaining, Some(60.0));
    }

    #[test]
    fn test_seek_for_absent_zone_is_noop() {
        let mut mirror = ZoneMirror::from_snapshot(vec![playing_zone("z1", 10.0, 100.0)]);
        let before = mirror.clone();

        let summary = mirror.apply_changes(ZonesChanged {
            zones_seek_changed: Some(vec![ZoneSeekChange {
                zone_id: ZoneId::new("ghost"),
                seek_position: Some(1.0),
                queue_time_remaining: Some(1.0),
            }]),
            ..Default::default()
        });

        assert_eq!(mirror, before);
        assert_eq!(summary.seek_unknown, 1);
        assert!(summary.is_empty());
    }

    #[test]
    fn test_anomalies_are_counted() {
        let mut mirror = ZoneMirror::from_snapshot(vec![zone("z1", &[])]);
        let summary = mirror.apply_changes(ZonesChanged {
            zones_removed: Some(vec![RemovedZone::from("ghost")]),
            zones_added: Some(vec![zone("z1", &["o1"])]),
            zones_changed: Some(vec![zone("z2", &[])]),
            zones_seek_changed: None,
        });

        assert_eq!(summary.removed_unknown, 1);
        assert_eq!(summary.added_existing, 1);
        assert_eq!(summary.changed_unknown, 1);
        assert_eq!(summary.anomalies(), 3);
        assert!(mirror.contains("z2"));
        assert!(mirror.zone_by_zone_id("z1").unwrap().has_output("o1"));
    }

    #[test]
    fn test_removing_zone_removes_its_outputs() {
        let mut mirror = ZoneMirror::from_snapshot(vec![zone("z1", &["o1", "o2"])]);
        mirror.remove("z1");
        assert!(mirror.zone_by_output_id("o1").is_none());
        assert!(mirror.zone_by_output_id("o2").is_none());
    }

    #[test]
    fn test_zone_by_ref() {
        let mirror = ZoneMirror::from_snapshot(vec![zone("z1", &["o1"]), zone("o1", &[])]);

        let raw = TargetRef::Id("o1".to_string());
        assert_eq!(mirror.zone_by_ref(&raw).unwrap().zone_id, "o1");

        let raw_output = TargetRef::Id("z1".to_string());
        assert_eq!(mirror.zone_by_ref(&raw_output).unwrap().zone_id, "z1");

        let by_output = TargetRef::record(None, Some("o1".into())).unwrap();
        assert_eq!(mirror.zone_by_ref(&by_output).unwrap().zone_id, "z1");

        let by_zone = TargetRef::record(Some("z9".into()), Some("o1".into())).unwrap();
        assert!(mirror.zone_by_ref(&by_zone).is_none());
    }
}
