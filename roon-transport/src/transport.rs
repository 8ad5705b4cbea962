//! RoonTransport - single entry point for the transport service
//!
//! Bundles the command dispatcher with the mirror of the most recent zones
//! subscription, so commands, subscriptions and zone lookups live on one
//! object.

use std::sync::{Arc, PoisonError, RwLock};

use roon_transport_api::{
    ClientConfig, Control, GetOutputsResponse, GetZonesResponse, IntoTarget, MooTransport,
    MuteHow, PendingReply, SeekHow, SettingsChange, Subscription, TransportClient, VolumeHow,
    Zone,
};
use roon_transport_state::{SubscribeZonesExt, ZoneSubscription, ZoneSynchronizer};
use tracing::{debug, warn};

use crate::TransportError;

/// Main entry point: commands, subscriptions and zone lookups
///
/// # Example
///
/// ```rust,ignore
/// use roon_transport::{Control, RoonTransport};
///
/// let roon = RoonTransport::new(session);
/// let mut zones = roon.subscribe_zones();
/// zones.next().await; // snapshot
///
/// let zone = roon.require_zone("Living Room output id")?;
/// roon.control(&zone, Control::PlayPause).await?;
/// ```
pub struct RoonTransport {
    client: TransportClient,

    /// Synchronizer of the most recent zones subscription
    zones: RwLock<Option<ZoneSynchronizer>>,
}

impl RoonTransport {
    /// Create a facade with the default configuration
    pub fn new(transport: Arc<dyn MooTransport>) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: Arc<dyn MooTransport>, config: ClientConfig) -> Self {
        Self {
            client: TransportClient::with_config(transport, config),
            zones: RwLock::new(None),
        }
    }

    /// Create a facade configured from `ROON_TRANSPORT_*` environment variables
    pub fn from_env(transport: Arc<dyn MooTransport>) -> Result<Self, TransportError> {
        Ok(Self::with_config(transport, ClientConfig::from_env()?))
    }

    /// The underlying command dispatcher
    pub fn client(&self) -> &TransportClient {
        &self.client
    }

    pub fn config(&self) -> &ClientConfig {
        self.client.config()
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    pub fn mute_all(&self, how: MuteHow) -> PendingReply<()> {
        self.client.mute_all(how)
    }

    pub fn pause_all(&self) -> PendingReply<()> {
        self.client.pause_all()
    }

    pub fn standby(&self, output: impl IntoTarget, control_key: Option<&str>) -> PendingReply<()> {
        self.client.standby(output, control_key)
    }

    pub fn toggle_standby(&self, output: impl IntoTarget, control_key: Option<&str>) -> PendingReply<()> {
        self.client.toggle_standby(output, control_key)
    }

    pub fn convenience_switch(&self, output: impl IntoTarget, control_key: Option<&str>) -> PendingReply<()> {
        self.client.convenience_switch(output, control_key)
    }

    pub fn mute(&self, output: impl IntoTarget, how: MuteHow) -> PendingReply<()> {
        self.client.mute(output, how)
    }

    pub fn change_volume(&self, output: impl IntoTarget, how: VolumeHow, value: f64) -> PendingReply<()> {
        self.client.change_volume(output, how, value)
    }

    pub fn seek(&self, zone_or_output: impl IntoTarget, how: SeekHow, seconds: f64) -> PendingReply<()> {
        self.client.seek(zone_or_output, how, seconds)
    }

    pub fn control(&self, zone_or_output: impl IntoTarget, control: Control) -> PendingReply<()> {
        self.client.control(zone_or_output, control)
    }

    pub fn transfer_zone(&self, from: impl IntoTarget, to: impl IntoTarget) -> PendingReply<()> {
        self.client.transfer_zone(from, to)
    }

    pub fn change_settings(&self, zone_or_output: impl IntoTarget, settings: SettingsChange) -> PendingReply<()> {
        self.client.change_settings(zone_or_output, settings)
    }

    pub fn play_from_here(&self, zone_or_output: impl IntoTarget, queue_item_id: u64) -> PendingReply<()> {
        self.client.play_from_here(zone_or_output, queue_item_id)
    }

    pub fn group_outputs<I>(&self, outputs: I) -> PendingReply<()>
    where
        I: IntoIterator,
        I::Item: IntoTarget,
    {
        self.client.group_outputs(outputs)
    }

    pub fn ungroup_outputs<I>(&self, outputs: I) -> PendingReply<()>
    where
        I: IntoIterator,
        I::Item: IntoTarget,
    {
        self.client.ungroup_outputs(outputs)
    }

    pub fn get_zones(&self) -> PendingReply<GetZonesResponse> {
        self.client.get_zones()
    }

    pub fn get_outputs(&self) -> PendingReply<GetOutputsResponse> {
        self.client.get_outputs()
    }

    // =========================================================================
    // SUBSCRIPTIONS
    // =========================================================================

    /// Subscribe to zones; this subscription's mirror backs the `zone_by_*` lookups
    ///
    /// A later call replaces the mirror used for lookups; earlier
    /// subscriptions keep their own mirrors.
    pub fn subscribe_zones(&self) -> ZoneSubscription {
        let subscription = self.client.subscribe_zones();
        let mut zones = self.zones.write().unwrap_or_else(|poisoned| {
            warn!("zone lookup lock was poisoned, recovering");
            self.zones.clear_poison();
            poisoned.into_inner()
        });
        *zones = Some(subscription.synchronizer().clone());
        drop(zones);
        debug!(key = %subscription.key(), "zone lookups now follow this subscription");
        subscription
    }

    pub fn subscribe_outputs(&self) -> Subscription {
        self.client.subscribe_outputs()
    }

    pub fn subscribe_queue(
        &self,
        zone_or_output: impl IntoTarget,
        max_item_count: u32,
    ) -> Result<Subscription, TransportError> {
        Ok(self.client.subscribe_queue(zone_or_output, max_item_count)?)
    }

    // =========================================================================
    // LOOKUPS
    // =========================================================================

    fn synchronizer(&self) -> Option<ZoneSynchronizer> {
        self.zones
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether the current zones subscription holds a snapshot
    pub fn is_subscribed(&self) -> bool {
        self.synchronizer().is_some_and(|sync| sync.is_subscribed())
    }

    pub fn zone_by_zone_id(&self, zone_id: &str) -> Option<Zone> {
        self.synchronizer()?.zone_by_zone_id(zone_id)
    }

    pub fn zone_by_output_id(&self, output_id: &str) -> Option<Zone> {
        self.synchronizer()?.zone_by_output_id(output_id)
    }

    pub fn zone_by_ref(&self, target: impl IntoTarget) -> Option<Zone> {
        self.synchronizer()?.zone_by_ref(target)
    }

    /// Every zone in the current mirror
    pub fn zones(&self) -> Vec<Zone> {
        self.synchronizer()
            .map(|sync| sync.zones())
            .unwrap_or_default()
    }

    /// Like [`zone_by_ref`](Self::zone_by_ref), but an error when nothing matches
    pub fn require_zone(&self, target: impl IntoTarget) -> Result<Zone, TransportError> {
        let sync = self.synchronizer().ok_or(TransportError::NotSubscribed)?;
        let target = target
            .into_target()
            .ok_or_else(|| TransportError::ZoneNotFound("<none>".to_string()))?;
        let label = target.zone_or_output_id().unwrap_or("<none>").to_string();
        sync.zone_by_ref(target)
            .ok_or(TransportError::ZoneNotFound(label))
    }
}

impl std::fmt::Debug for RoonTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoonTransport")
            .field("client", &self.client)
            .field("is_subscribed", &self.is_subscribed())
            .finish()
    }
}
