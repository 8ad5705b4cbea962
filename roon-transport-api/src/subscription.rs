//! Subscription handles with idempotent teardown
//!
//! A `Subscription` is the receiving end of one transport subscription. Events
//! arrive in delivery order as `(tag, raw JSON)` pairs and the handle is a
//! `futures::Stream` of them. The stream ends after the `Unsubscribed` event.
//!
//! Undrained events are held in a bounded broadcast buffer. When a subscriber
//! falls further behind than the buffer, the oldest events are discarded and
//! counted in [`Subscription::dropped_events`].

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use futures::{FutureExt, Stream, StreamExt};
use moo_client::{MooTransport, ResponseTag, SubscriptionKey};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::service::Topic;

/// One event delivered on a subscription, forwarded verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionEvent {
    pub tag: ResponseTag,
    pub body: Value,
}

impl SubscriptionEvent {
    pub fn new(tag: ResponseTag, body: Value) -> Self {
        Self { tag, body }
    }

    /// Decode the body into one of the typed payloads
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(T::deserialize(&self.body)?)
    }

    pub fn is_subscribed(&self) -> bool {
        self.tag == ResponseTag::Subscribed
    }

    pub fn is_changed(&self) -> bool {
        self.tag == ResponseTag::Changed
    }

    pub fn is_unsubscribed(&self) -> bool {
        self.tag == ResponseTag::Unsubscribed
    }
}

/// Shared liveness flag of one subscription
///
/// Cleared by the first `unsubscribe()` or by the server's `Unsubscribed`
/// event, whichever comes first.
#[derive(Debug, Clone, Default)]
pub(crate) struct ActiveFlag(Arc<AtomicBool>);

impl ActiveFlag {
    pub(crate) fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub(crate) fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear the flag, returning whether it was still set
    pub(crate) fn clear(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

/// Build the transport event handler for a subscription
///
/// `hook` runs before the event is queued for the subscriber, so state it
/// maintains is already updated when the subscriber sees the event. The hook
/// sees every event even when the queue later discards it.
pub(crate) fn forwarding_handler<F>(
    active: ActiveFlag,
    sender: broadcast::Sender<SubscriptionEvent>,
    mut hook: F,
) -> moo_client::EventHandler
where
    F: FnMut(&ResponseTag, &Value) + Send + 'static,
{
    let mut sender = Some(sender);
    Box::new(move |tag, body| {
        hook(&tag, &body);

        let teardown = tag == ResponseTag::Unsubscribed;
        if teardown {
            active.clear();
        }
        if let Some(tx) = sender.as_ref() {
            // Subscriber gone; nothing left to deliver to
            let _ = tx.send(SubscriptionEvent::new(tag, body));
        }
        if teardown {
            sender = None;
        }
    })
}

/// Handle to a live transport subscription
///
/// Dropping the handle unsubscribes.
pub struct Subscription {
    key: SubscriptionKey,
    topic: Topic,
    transport: Arc<dyn MooTransport>,
    active: ActiveFlag,
    events: BroadcastStream<SubscriptionEvent>,
    dropped: u64,
}

impl Subscription {
    pub(crate) fn new(
        key: SubscriptionKey,
        topic: Topic,
        transport: Arc<dyn MooTransport>,
        active: ActiveFlag,
        events: broadcast::Receiver<SubscriptionEvent>,
    ) -> Self {
        Self {
            key,
            topic,
            transport,
            active,
            events: BroadcastStream::new(events),
            dropped: 0,
        }
    }

    pub fn key(&self) -> SubscriptionKey {
        self.key
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Whether neither side has ended the subscription yet
    pub fn is_active(&self) -> bool {
        self.active.is_set()
    }

    /// Events discarded because this subscriber fell behind the buffer
    pub fn dropped_events(&self) -> u64 {
        self.dropped
    }

    /// Wait for the next event; `None` once the subscription has ended
    pub async fn next(&mut self) -> Option<SubscriptionEvent> {
        StreamExt::next(self).await
    }

    /// Take the next already-delivered event without waiting
    pub fn try_next(&mut self) -> Option<SubscriptionEvent> {
        StreamExt::next(self).now_or_never().flatten()
    }

    /// Ask the server to end the subscription
    ///
    /// Only the first call sends anything; later calls, and calls after the
    /// server already ended the subscription, do nothing.
    pub fn unsubscribe(&self) {
        if self.active.clear() {
            debug!(key = %self.key, topic = %self.topic, "unsubscribing");
            self.transport.unsubscribe(self.key);
        }
    }
}

impl Stream for Subscription {
    type Item = SubscriptionEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match ready!(Pin::new(&mut self.events).poll_next(cx)) {
                Some(Ok(event)) => return Poll::Ready(Some(event)),
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    warn!(
                        key = %self.key,
                        topic = %self.topic,
                        skipped,
                        "subscriber fell behind, oldest events dropped"
                    );
                    self.dropped += skipped;
                }
                None => return Poll::Ready(None),
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("topic", &self.topic)
            .field("active", &self.is_active())
            .field("dropped", &self.dropped)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_decode() {
        #[derive(serde::Deserialize)]
        struct Payload {
            count: u32,
        }

        let event = SubscriptionEvent::new(ResponseTag::Changed, json!({"count": 3}));
        assert!(event.is_changed());
        assert_eq!(event.decode::<Payload>().unwrap().count, 3);
        assert!(matches!(
            event.decode::<Vec<u32>>(),
            Err(ApiError::ParseError(_))
        ));
    }

    #[test]
    fn test_active_flag_clears_once() {
        let flag = ActiveFlag::new();
        assert!(flag.clone().clear());
        assert!(!flag.clear());
        assert!(!flag.is_set());
    }

    #[test]
    fn test_forwarding_handler_runs_hook_first_and_closes_on_teardown() {
        let (tx, mut rx) = broadcast::channel(8);
        let active = ActiveFlag::new();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let hook_seen = Arc::clone(&seen);

        let mut handler = forwarding_handler(active.clone(), tx, move |tag, _| {
            hook_seen.lock().unwrap().push(tag.clone());
        });

        handler(ResponseTag::Subscribed, json!({}));
        handler(ResponseTag::Unsubscribed, json!({}));
        handler(ResponseTag::Changed, json!({}));

        assert_eq!(seen.lock().unwrap().len(), 3);
        assert!(!active.is_set());
        assert!(rx.try_recv().unwrap().is_subscribed());
        assert!(rx.try_recv().unwrap().is_unsubscribed());
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Closed)
        ));
    }
}
