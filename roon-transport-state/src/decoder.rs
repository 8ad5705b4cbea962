//! Event decoder - converts raw zone subscription events to typed events
//!
//! Decoding is lenient per record: a zone (or seek entry, or removal) that
//! does not decode is skipped and counted instead of failing the whole event.
//! Only a body whose overall shape is wrong produces an error.

use moo_client::ResponseTag;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::trace;

use roon_transport_api::{Zone, ZonesChanged};

use crate::error::{Result, StateError};

/// A zones-topic event, decoded
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneEvent {
    /// Full snapshot that replaces the mirror
    Snapshot(Vec<Zone>),
    /// Delta applied to the mirror
    Changed(ZonesChanged),
    /// The subscription is gone; the mirror must be discarded
    Teardown,
    /// A tag this synchronizer does not handle
    Unknown(String),
}

/// Result of decoding one event
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedZoneEvent {
    pub event: ZoneEvent,
    /// Records dropped because they did not decode
    pub skipped: usize,
}

/// Decode a raw zones-topic event
pub fn decode_zone_event(tag: &ResponseTag, body: &Value) -> Result<DecodedZoneEvent> {
    let mut skipped = 0;
    let event = match tag {
        ResponseTag::Subscribed => {
            let fields = as_object(tag, body)?;
            let zones = decode_list::<Zone>(tag, &fields, "zones", &mut skipped)?;
            ZoneEvent::Snapshot(zones.unwrap_or_default())
        }
        ResponseTag::Changed => {
            let fields = as_object(tag, body)?;
            ZoneEvent::Changed(ZonesChanged {
                zones_removed: decode_list(tag, &fields, "zones_removed", &mut skipped)?,
                zones_added: decode_list(tag, &fields, "zones_added", &mut skipped)?,
                zones_changed: decode_list(tag, &fields, "zones_changed", &mut skipped)?,
                zones_seek_changed: decode_list(tag, &fields, "zones_seek_changed", &mut skipped)?,
            })
        }
        ResponseTag::Unsubscribed => ZoneEvent::Teardown,
        ResponseTag::Other(name) => ZoneEvent::Unknown(name.clone()),
    };

    Ok(DecodedZoneEvent { event, skipped })
}

/// A null body is treated as an empty object
fn as_object(tag: &ResponseTag, body: &Value) -> Result<Map<String, Value>> {
    match body {
        Value::Object(fields) => Ok(fields.clone()),
        Value::Null => Ok(Map::new()),
        other => Err(StateError::decode(
            tag.as_str(),
            format!("expected an object body, got {}", kind(other)),
        )),
    }
}

fn decode_list<T: DeserializeOwned>(
    tag: &ResponseTag,
    fields: &Map<String, Value>,
    field: &str,
    skipped: &mut usize,
) -> Result<Option<Vec<T>>> {
    let items = match fields.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(StateError::decode(
                tag.as_str(),
                format!("`{}` must be a list, got {}", field, kind(other)),
            ))
        }
    };

    let mut decoded = Vec::with_capacity(items.len());
    for item in items {
        match T::deserialize(item) {
            Ok(value) => decoded.push(value),
            Err(e) => {
                trace!(field, error = %e, "skipping undecodable record");
                *skipped += 1;
            }
        }
    }
    Ok(Some(decoded))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roon_transport_api::ZoneId;
    use serde_json::json;

    #[test]
    fn test_decode_snapshot() {
        let decoded = decode_zone_event(
            &ResponseTag::Subscribed,
            &json!({"zones": [{"zone_id": "z1", "display_name": "Den"}]}),
        )
        .unwrap();

        match decoded.event {
            ZoneEvent::Snapshot(zones) => {
                assert_eq!(zones.len(), 1);
                assert_eq!(zones[0].display_name, "Den");
            }
            other => panic!("expected snapshot, got {:?}", other),
        }
        assert_eq!(decoded.skipped, 0);
    }

    #[test]
    fn test_snapshot_without_zones_is_empty() {
        let decoded = decode_zone_event(&ResponseTag::Subscribed, &json!({})).unwrap();
        assert_eq!(decoded.event, ZoneEvent::Snapshot(vec![]));
    }

    #[test]
    fn test_bad_records_are_skipped() {
        let decoded = decode_zone_event(
            &ResponseTag::Changed,
            &json!({
                "zones_added": [{"zone_id": "z1"}, {"display_name": "no id"}],
                "zones_seek_changed": [{"zone_id": "z1", "seek_position": 3.5}, 17]
            }),
        )
        .unwrap();

        let ZoneEvent::Changed(delta) = decoded.event else {
            panic!("expected delta");
        };
        assert_eq!(delta.zones_added.unwrap().len(), 1);
        assert_eq!(delta.zones_seek_changed.unwrap()[0].seek_position, Some(3.5));
        assert!(delta.zones_removed.is_none());
        assert_eq!(decoded.skipped, 2);
    }

    #[test]
    fn test_removed_accepts_ids_and_records() {
        let decoded = decode_zone_event(
            &ResponseTag::Changed,
            &json!({"zones_removed": ["z1", {"zone_id": "z2"}]}),
        )
        .unwrap();

        let ZoneEvent::Changed(delta) = decoded.event else {
            panic!("expected delta");
        };
        let removed: Vec<&ZoneId> = delta
            .zones_removed
            .as_ref()
            .unwrap()
            .iter()
            .map(|r| r.zone_id())
            .collect();
        assert_eq!(removed, vec!["z1", "z2"]);
    }

    #[test]
    fn test_wrong_shape_is_an_error() {
        let err = decode_zone_event(&ResponseTag::Changed, &json!({"zones_changed": {}})).unwrap_err();
        assert!(matches!(err, StateError::Decode { ref tag, .. } if tag == "Changed"));

        let err = decode_zone_event(&ResponseTag::Subscribed, &json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("a list"));
    }

    #[test]
    fn test_other_tags() {
        let teardown = decode_zone_event(&ResponseTag::Unsubscribed, &json!({})).unwrap();
        assert_eq!(teardown.event, ZoneEvent::Teardown);

        let unknown = decode_zone_event(&ResponseTag::from_name("Paused"), &Value::Null).unwrap();
        assert_eq!(unknown.event, ZoneEvent::Unknown("Paused".to_string()));
    }
}
