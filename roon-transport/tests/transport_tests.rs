//! Facade tests: commands, subscriptions and lookups on one object

use std::sync::Arc;

use moo_client::mock::MockTransport;
use roon_transport::{
    ClientConfig, Control, MuteHow, Output, RoonTransport, TransportError, ValidationLevel,
};
use roon_transport_api::{ApiError, ResponseTag};
use serde_json::json;

fn setup() -> (Arc<MockTransport>, RoonTransport) {
    let mock = Arc::new(MockTransport::new());
    let roon = RoonTransport::new(mock.clone());
    (mock, roon)
}

fn snapshot() -> serde_json::Value {
    json!({"zones": [
        {"zone_id": "z1", "display_name": "Living Room",
         "outputs": [{"output_id": "o1", "zone_id": "z1", "display_name": "Hegel H190"}]},
        {"zone_id": "z2", "display_name": "Office",
         "outputs": [{"output_id": "o2", "zone_id": "z2", "display_name": "Desk"}]}
    ]})
}

#[tokio::test]
async fn test_commands_go_through_the_dispatcher() {
    let (mock, roon) = setup();

    let pending = roon.control("z1", Control::Next);
    mock.reply_success(None).unwrap();
    assert_eq!(pending.await, Ok(()));

    let pending = roon.mute(None::<&Output>, MuteHow::Mute);
    assert_eq!(pending.await, Err(ApiError::MissingTarget("output")));

    let names: Vec<String> = mock.requests().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["com.roonlabs.transport:2/control"]);
}

#[test]
fn test_config_is_passed_to_the_client() {
    let mock = Arc::new(MockTransport::new());
    let roon = RoonTransport::with_config(mock.clone(), ClientConfig::unvalidated());

    assert_eq!(roon.config().validation, ValidationLevel::None);
    let _pending = roon.group_outputs(Vec::<&str>::new());
    assert_eq!(mock.request_count(), 1);
}

#[test]
fn test_lookups_before_subscribing() {
    let (_mock, roon) = setup();

    assert!(!roon.is_subscribed());
    assert!(roon.zone_by_zone_id("z1").is_none());
    assert!(roon.zones().is_empty());
    assert!(matches!(roon.require_zone("z1"), Err(TransportError::NotSubscribed)));
}

#[test]
fn test_lookups_follow_the_zones_subscription() {
    let (mock, roon) = setup();
    let zones = roon.subscribe_zones();
    mock.emit(zones.key(), ResponseTag::Subscribed, snapshot()).unwrap();

    assert!(roon.is_subscribed());
    assert_eq!(roon.zone_by_output_id("o2").unwrap().display_name, "Office");
    assert_eq!(roon.zone_by_ref("o1").unwrap().zone_id, "z1");
    assert_eq!(roon.require_zone("z2").unwrap().zone_id, "z2");
    assert!(matches!(
        roon.require_zone("z9"),
        Err(TransportError::ZoneNotFound(ref id)) if id == "z9"
    ));

    mock.emit_named(zones.key(), "Changed", json!({"zones_removed": ["z2"]}))
        .unwrap();
    assert!(roon.zone_by_output_id("o2").is_none());
    assert_eq!(roon.zones().len(), 1);
}

#[test]
fn test_latest_zones_subscription_wins() {
    let (mock, roon) = setup();
    let first = roon.subscribe_zones();
    mock.emit(first.key(), ResponseTag::Subscribed, snapshot()).unwrap();

    let second = roon.subscribe_zones();
    assert!(!roon.is_subscribed());

    mock.emit_named(second.key(), "Subscribed", json!({"zones": [{"zone_id": "z3"}]}))
        .unwrap();
    assert_eq!(roon.zones().len(), 1);
    assert!(roon.zone_by_zone_id("z3").is_some());
    assert_eq!(first.zones().len(), 2);
}

#[test]
fn test_lookups_survive_dropping_the_handle_until_teardown() {
    let (mock, roon) = setup();
    mock.set_ack_unsubscribe(false);
    let zones = roon.subscribe_zones();
    let key = zones.key();
    mock.emit(key, ResponseTag::Subscribed, snapshot()).unwrap();

    drop(zones);

    assert_eq!(mock.unsubscribe_calls(), vec![key]);
    assert!(roon.zone_by_zone_id("z1").is_some());
}

#[test]
fn test_queue_subscription_requires_a_target() {
    let (mock, roon) = setup();

    let result = roon.subscribe_queue(None::<&str>, 50);

    assert!(matches!(
        result,
        Err(TransportError::ApiError(ApiError::MissingTarget("zone_or_output")))
    ));
    assert!(mock.subscriptions().is_empty());
}
