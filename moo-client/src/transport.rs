//! The transport trait every session object implements

use std::sync::Arc;

use serde_json::Value;

use crate::{Reply, ResponseTag, SubscriptionKey};

/// Handler for the single reply to a request
///
/// Called with `None` when the transport could not deliver a reply at all.
/// Dropping the handler without calling it means the same thing.
pub type ReplyHandler = Box<dyn FnOnce(Option<Reply>) + Send + 'static>;

/// Handler for the events of one subscription, called in delivery order
pub type EventHandler = Box<dyn FnMut(ResponseTag, Value) + Send + 'static>;

/// A multiplexed request/subscription session with a core
///
/// Implementations own framing, connection management and request ids.
/// All methods return immediately; results arrive later through the handlers.
///
/// Contract:
/// - `send_request` sends exactly one request and invokes `on_reply` at most once.
/// - `subscribe` delivers events for one subscription strictly in order, and
///   never runs two handler calls for the same subscription concurrently.
/// - `unsubscribe` asks the core to end the subscription; the core confirms
///   with a final [`ResponseTag::Unsubscribed`] event.
pub trait MooTransport: Send + Sync {
    /// Send a request named `"<service>/<method>"` with an optional body
    fn send_request(&self, name: &str, body: Option<Value>, on_reply: ReplyHandler);

    /// Open a subscription to `topic` on `service`
    fn subscribe(
        &self,
        service: &str,
        topic: &str,
        params: Option<Value>,
        on_event: EventHandler,
    ) -> SubscriptionKey;

    /// End a subscription opened with [`MooTransport::subscribe`]
    fn unsubscribe(&self, key: SubscriptionKey);
}

impl<T: MooTransport + ?Sized> MooTransport for Arc<T> {
    fn send_request(&self, name: &str, body: Option<Value>, on_reply: ReplyHandler) {
        (**self).send_request(name, body, on_reply)
    }

    fn subscribe(
        &self,
        service: &str,
        topic: &str,
        params: Option<Value>,
        on_event: EventHandler,
    ) -> SubscriptionKey {
        (**self).subscribe(service, topic, params, on_event)
    }

    fn unsubscribe(&self, key: SubscriptionKey) {
        (**self).unsubscribe(key)
    }
}

/// Build the fully qualified request name for a service method
pub fn request_name(service: &str, method: &str) -> String {
    format!("{}/{}", service, method)
}
