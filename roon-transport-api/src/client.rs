//! Command dispatcher for the transport service
//!
//! `TransportClient` turns each command into one named request on the
//! underlying MOO transport and hands back a [`PendingReply`] that resolves
//! exactly once. Missing targets and invalid parameters fail locally without
//! sending anything. Subscriptions are opened here too, with a hook for state
//! that must see each event before the subscriber does.

use std::sync::Arc;

use moo_client::{request_name, MooTransport, ResponseTag};
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::model::{IntoTarget, TargetRef};
use crate::operation::TransportOperation;
use crate::reply::{normalize_reply, PendingReply};
use crate::service::Topic;
use crate::services::transport::*;
use crate::subscription::{forwarding_handler, ActiveFlag, Subscription};

/// Resolve a precondition or return an already-failed reply
macro_rules! try_ready {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(error) => return PendingReply::ready(Err(error)),
        }
    };
}

fn require_output_id(target: impl IntoTarget, parameter: &'static str) -> Result<String, ApiError> {
    target
        .into_target()
        .as_ref()
        .and_then(TargetRef::output_id)
        .map(str::to_string)
        .ok_or(ApiError::MissingTarget(parameter))
}

fn require_zone_or_output_id(
    target: impl IntoTarget,
    parameter: &'static str,
) -> Result<String, ApiError> {
    target
        .into_target()
        .as_ref()
        .and_then(TargetRef::zone_or_output_id)
        .map(str::to_string)
        .ok_or(ApiError::MissingTarget(parameter))
}

fn require_output_ids<I>(outputs: I) -> Result<Vec<String>, ApiError>
where
    I: IntoIterator,
    I::Item: IntoTarget,
{
    outputs
        .into_iter()
        .map(|output| require_output_id(output, "outputs"))
        .collect()
}

/// Client for the transport service on one core
///
/// Wraps a shared transport session. Every command sends exactly one request
/// as soon as it is called and returns a [`PendingReply`] that resolves once.
/// A command whose target is absent sends nothing and resolves immediately
/// with [`ApiError::MissingTarget`].
///
/// ```rust,ignore
/// let client = TransportClient::new(session);
/// client.control(&zone, Control::PlayPause).await?;
/// client.change_volume(&zone.outputs[0], VolumeHow::RelativeStep, 1.0).await?;
/// ```
#[derive(Clone)]
pub struct TransportClient {
    transport: Arc<dyn MooTransport>,
    config: ClientConfig,
}

impl TransportClient {
    /// Create a client with the default configuration
    pub fn new(transport: Arc<dyn MooTransport>) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: Arc<dyn MooTransport>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<dyn MooTransport> {
        &self.transport
    }

    /// Execute a transport operation
    ///
    /// Validates and sends the request, then maps the reply: `"Success"`
    /// decodes the body into `Op::Response`, any other reply name becomes
    /// [`ApiError::Protocol`] and a missing reply [`ApiError::NetworkError`].
    pub fn execute<Op: TransportOperation>(&self, request: &Op::Request) -> PendingReply<Op::Response> {
        let body = try_ready!(Op::build_body(request, self.config.validation));
        let name = request_name(&self.config.service_name, Op::METHOD);
        debug!(request = %name, "sending transport request");

        let (tx, pending) = PendingReply::channel();
        self.transport.send_request(
            &name,
            body,
            Box::new(move |reply| {
                let result = normalize_reply(reply).and_then(Op::parse_response);
                if let Err(ref error) = result {
                    trace!(method = Op::METHOD, code = error.code(), "transport request failed");
                }
                // Caller dropped the future; the request still happened
                let _ = tx.send(result);
            }),
        );
        pending
    }

    // =========================================================================
    // BULK ACTIONS
    // =========================================================================

    /// Mute or unmute every zone that can be muted
    pub fn mute_all(&self, how: MuteHow) -> PendingReply<()> {
        self.execute::<MuteAllOperation>(&MuteAllOperationRequest { how })
    }

    /// Pause every zone
    pub fn pause_all(&self) -> PendingReply<()> {
        self.execute::<PauseAllOperation>(&PauseAllOperationRequest {})
    }

    // =========================================================================
    // OUTPUT ACTIONS
    // =========================================================================

    /// Put an output into standby
    ///
    /// Without a `control_key`, every source control of the output that
    /// supports standby is affected.
    pub fn standby(&self, output: impl IntoTarget, control_key: Option<&str>) -> PendingReply<()> {
        let output_id = try_ready!(require_output_id(output, "output"));
        self.execute::<StandbyOperation>(&StandbyOperationRequest {
            output_id,
            control_key: control_key.map(str::to_string),
        })
    }

    /// Toggle the standby state of an output
    pub fn toggle_standby(&self, output: impl IntoTarget, control_key: Option<&str>) -> PendingReply<()> {
        let output_id = try_ready!(require_output_id(output, "output"));
        self.execute::<ToggleStandbyOperation>(&ToggleStandbyOperationRequest {
            output_id,
            control_key: control_key.map(str::to_string),
        })
    }

    /// Convenience-switch an output, taking it out of standby if needed
    pub fn convenience_switch(
        &self,
        output: impl IntoTarget,
        control_key: Option<&str>,
    ) -> PendingReply<()> {
        let output_id = try_ready!(require_output_id(output, "output"));
        self.execute::<ConvenienceSwitchOperation>(&ConvenienceSwitchOperationRequest {
            output_id,
            control_key: control_key.map(str::to_string),
        })
    }

    /// Mute or unmute an output
    pub fn mute(&self, output: impl IntoTarget, how: MuteHow) -> PendingReply<()> {
        let output_id = try_ready!(require_output_id(output, "output"));
        self.execute::<MuteOperation>(&MuteOperationRequest { output_id, how })
    }

    /// Change the volume of an output
    ///
    /// `value` is in the output's native volume units (see `VolumeInfo`).
    pub fn change_volume(&self, output: impl IntoTarget, how: VolumeHow, value: f64) -> PendingReply<()> {
        let output_id = try_ready!(require_output_id(output, "output"));
        self.execute::<ChangeVolumeOperation>(&ChangeVolumeOperationRequest {
            output_id,
            how,
            value,
        })
    }

    // =========================================================================
    // ZONE ACTIONS
    // =========================================================================

    /// Seek within the now-playing media of a zone
    pub fn seek(&self, zone_or_output: impl IntoTarget, how: SeekHow, seconds: f64) -> PendingReply<()> {
        let zone_or_output_id = try_ready!(require_zone_or_output_id(zone_or_output, "zone_or_output"));
        self.execute::<SeekOperation>(&SeekOperationRequest {
            zone_or_output_id,
            how,
            seconds,
        })
    }

    /// Execute a transport control on a zone
    pub fn control(&self, zone_or_output: impl IntoTarget, control: Control) -> PendingReply<()> {
        let zone_or_output_id = try_ready!(require_zone_or_output_id(zone_or_output, "zone_or_output"));
        self.execute::<ControlOperation>(&ControlOperationRequest {
            zone_or_output_id,
            control,
        })
    }

    /// Transfer the current queue from one zone to another
    pub fn transfer_zone(&self, from: impl IntoTarget, to: impl IntoTarget) -> PendingReply<()> {
        let from_zone_or_output_id = try_ready!(require_zone_or_output_id(from, "from"));
        let to_zone_or_output_id = try_ready!(require_zone_or_output_id(to, "to"));
        self.execute::<TransferZoneOperation>(&TransferZoneOperationRequest {
            from_zone_or_output_id,
            to_zone_or_output_id,
        })
    }

    /// Change shuffle, auto-radio or loop settings of a zone
    pub fn change_settings(
        &self,
        zone_or_output: impl IntoTarget,
        settings: SettingsChange,
    ) -> PendingReply<()> {
        let zone_or_output_id = try_ready!(require_zone_or_output_id(zone_or_output, "zone_or_output"));
        self.execute::<ChangeSettingsOperation>(&ChangeSettingsOperationRequest {
            zone_or_output_id,
            settings,
        })
    }

    /// Start playback from a queue item
    pub fn play_from_here(&self, zone_or_output: impl IntoTarget, queue_item_id: u64) -> PendingReply<()> {
        let zone_or_output_id = try_ready!(require_zone_or_output_id(zone_or_output, "zone_or_output"));
        self.execute::<PlayFromHereOperation>(&PlayFromHereOperationRequest {
            zone_or_output_id,
            queue_item_id,
        })
    }

    // =========================================================================
    // GROUPING
    // =========================================================================

    /// Group outputs into one synchronized zone
    ///
    /// The queue of the first output's zone is preserved. Every element must
    /// resolve to an output id.
    pub fn group_outputs<I>(&self, outputs: I) -> PendingReply<()>
    where
        I: IntoIterator,
        I::Item: IntoTarget,
    {
        let output_ids = try_ready!(require_output_ids(outputs));
        self.execute::<GroupOutputsOperation>(&GroupOutputsOperationRequest { output_ids })
    }

    /// Ungroup previously grouped outputs
    pub fn ungroup_outputs<I>(&self, outputs: I) -> PendingReply<()>
    where
        I: IntoIterator,
        I::Item: IntoTarget,
    {
        let output_ids = try_ready!(require_output_ids(outputs));
        self.execute::<UngroupOutputsOperation>(&UngroupOutputsOperationRequest { output_ids })
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Fetch every zone once
    pub fn get_zones(&self) -> PendingReply<GetZonesResponse> {
        self.execute::<GetZonesOperation>(&GetZonesOperationRequest {})
    }

    /// Fetch every output once
    pub fn get_outputs(&self) -> PendingReply<GetOutputsResponse> {
        self.execute::<GetOutputsOperation>(&GetOutputsOperationRequest {})
    }

    // =========================================================================
    // SUBSCRIPTIONS
    // =========================================================================

    /// Subscribe to a topic, running `hook` on each event before it is queued
    pub fn subscribe_with<F>(&self, topic: Topic, params: Option<Value>, hook: F) -> Subscription
    where
        F: FnMut(&ResponseTag, &Value) + Send + 'static,
    {
        let (tx, rx) = broadcast::channel(self.config.event_buffer.max(1));
        let active = ActiveFlag::new();
        let handler = forwarding_handler(active.clone(), tx, hook);

        let key = self
            .transport
            .subscribe(&self.config.service_name, topic.name(), params, handler);
        debug!(%key, %topic, "subscribed");

        Subscription::new(key, topic, Arc::clone(&self.transport), active, rx)
    }

    /// Subscribe to a topic with every event passed straight through
    pub fn subscribe(&self, topic: Topic, params: Option<Value>) -> Subscription {
        self.subscribe_with(topic, params, |_, _| {})
    }

    /// Subscribe to output snapshots and deltas
    pub fn subscribe_outputs(&self) -> Subscription {
        self.subscribe(Topic::Outputs, None)
    }

    /// Subscribe to the play queue of a zone
    ///
    /// Fails with [`ApiError::MissingTarget`] without subscribing when the
    /// target is absent.
    pub fn subscribe_queue(
        &self,
        zone_or_output: impl IntoTarget,
        max_item_count: u32,
    ) -> Result<Subscription, ApiError> {
        let zone_or_output_id = require_zone_or_output_id(zone_or_output, "zone_or_output")?;
        let params = json!({
            "zone_or_output_id": zone_or_output_id,
            "max_item_count": max_item_count,
        });
        Ok(self.subscribe(Topic::Queue, Some(params)))
    }
}

impl std::fmt::Debug for TransportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
