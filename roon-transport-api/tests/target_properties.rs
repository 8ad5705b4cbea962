//! Property-based tests for target resolution and request bodies

use std::sync::Arc;

use moo_client::mock::MockTransport;
use proptest::prelude::*;
use serde_json::json;

use roon_transport_api::{IntoTarget, Output, SeekHow, TransportClient, VolumeHow, Zone};

fn id_strategy() -> impl Strategy<Value = String> {
    "[0-9a-f]{8,32}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Output records always resolve to their output id, for both kinds of command
    #[test]
    fn prop_output_record_resolves_to_output_id(
        zone_id in id_strategy(),
        output_id in id_strategy(),
    ) {
        let output = Output::new(output_id.as_str(), zone_id.as_str(), "Amp");
        let target = (&output).into_target().unwrap();

        prop_assert_eq!(target.output_id(), Some(output_id.as_str()));
        prop_assert_eq!(target.zone_or_output_id(), Some(output_id.as_str()));
        prop_assert_eq!(target.zone_id(), Some(zone_id.as_str()));
    }

    /// Raw ids go out verbatim
    #[test]
    fn prop_raw_id_sent_verbatim(id in id_strategy(), seconds in -3600i64..3600) {
        let mock = Arc::new(MockTransport::new());
        let client = TransportClient::new(mock.clone());

        let _pending = client.seek(id.as_str(), SeekHow::Absolute, seconds as f64);

        let body = mock.last_request().unwrap().body.unwrap();
        prop_assert_eq!(body, json!({"zone_or_output_id": id, "how": "absolute", "seconds": seconds}));
    }

    /// Zone records resolve to the zone id when no output id is carried
    #[test]
    fn prop_zone_record_resolves_to_zone_id(zone_id in id_strategy()) {
        let zone = Zone::new(zone_id.as_str(), "Den");
        let target = (&zone).into_target().unwrap();

        prop_assert_eq!(target.zone_or_output_id(), Some(zone_id.as_str()));
        prop_assert_eq!(target.output_id(), None);
    }

    /// Finite volume values are always accepted and sent
    #[test]
    fn prop_finite_volume_is_sent(value in -120.0f64..120.0) {
        let mock = Arc::new(MockTransport::new());
        let client = TransportClient::new(mock.clone());

        let pending = client.change_volume("o1", VolumeHow::Absolute, value);

        prop_assert!(!pending.is_ready());
        prop_assert_eq!(mock.request_count(), 1);
    }
}
