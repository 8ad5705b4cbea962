//! Zone subscriptions with a live mirror attached
//!
//! [`SubscribeZonesExt::subscribe_zones`] opens a zones-topic subscription on a
//! [`TransportClient`] and feeds every event into a fresh
//! [`ZoneSynchronizer`] before the event reaches the caller. By the time
//! `next()` yields an event, lookups already reflect it.
//!
//! ```rust,ignore
//! use roon_transport_state::SubscribeZonesExt;
//!
//! let mut zones = client.subscribe_zones();
//! while let Some(event) = zones.next().await {
//!     if let Some(zone) = zones.zone_by_output_id("1701b9ea8be6fe1b6fc2") {
//!         println!("{} is {:?}", zone.display_name, zone.state);
//!     }
//! }
//! ```

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;

use roon_transport_api::{
    IntoTarget, Subscription, SubscriptionEvent, SubscriptionKey, Topic, TransportClient, Zone,
    ZoneId,
};

use crate::diagnostics::DiagnosticsSnapshot;
use crate::synchronizer::ZoneSynchronizer;

/// A zones-topic subscription and the mirror it keeps current
///
/// Each subscription owns its own mirror; two subscriptions never share state.
/// Dropping the subscription unsubscribes it.
#[derive(Debug)]
pub struct ZoneSubscription {
    inner: Subscription,
    zones: ZoneSynchronizer,
}

impl ZoneSubscription {
    pub fn key(&self) -> SubscriptionKey {
        self.inner.key()
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    /// The mirror's synchronizer; clones stay valid after the subscription is dropped
    pub fn synchronizer(&self) -> &ZoneSynchronizer {
        &self.zones
    }

    /// Wait for the next event, already applied to the mirror
    pub async fn next(&mut self) -> Option<SubscriptionEvent> {
        self.inner.next().await
    }

    /// Take the next queued event without waiting
    pub fn try_next(&mut self) -> Option<SubscriptionEvent> {
        self.inner.try_next()
    }

    /// Stop the subscription; repeated calls do nothing
    pub fn unsubscribe(&self) {
        self.inner.unsubscribe();
    }

    pub fn zone_by_zone_id(&self, zone_id: &str) -> Option<Zone> {
        self.zones.zone_by_zone_id(zone_id)
    }

    pub fn zone_by_output_id(&self, output_id: &str) -> Option<Zone> {
        self.zones.zone_by_output_id(output_id)
    }

    pub fn zone_by_ref(&self, target: impl IntoTarget) -> Option<Zone> {
        self.zones.zone_by_ref(target)
    }

    pub fn zones(&self) -> Vec<Zone> {
        self.zones.zones()
    }

    pub fn zone_ids(&self) -> Vec<ZoneId> {
        self.zones.zone_ids()
    }

    /// Events discarded because they were not drained in time
    ///
    /// Every event reaches the mirror before it is queued, so drops never make
    /// lookups stale.
    pub fn dropped_events(&self) -> u64 {
        self.inner.dropped_events()
    }

    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            dropped_events: self.inner.dropped_events(),
            ..self.zones.diagnostics()
        }
    }
}

impl Stream for ZoneSubscription {
    type Item = SubscriptionEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

/// Extension trait adding mirrored zone subscriptions to a transport client
pub trait SubscribeZonesExt {
    /// Subscribe to the zones topic with a fresh mirror
    fn subscribe_zones(&self) -> ZoneSubscription;
}

impl SubscribeZonesExt for TransportClient {
    fn subscribe_zones(&self) -> ZoneSubscription {
        let zones = ZoneSynchronizer::new();
        let sync = zones.clone();
        let inner = self.subscribe_with(Topic::Zones, None, move |tag, body| {
            sync.handle_event(tag, body);
        });
        ZoneSubscription { inner, zones }
    }
}
