//! Recording in-process transport for tests
//!
//! `MockTransport` records every request and subscription, parks reply
//! handlers until the test answers them, and lets the test push events into
//! any live subscription. Handlers are always invoked with the internal lock
//! released, so they may call back into the transport.

use std::collections::{BTreeMap, VecDeque};

use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::{EventHandler, MooError, MooTransport, Reply, ReplyHandler, ResponseTag, SubscriptionKey};

/// A request as the transport saw it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub name: String,
    pub body: Option<Value>,
}

/// A subscription as the transport saw it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSubscription {
    pub key: SubscriptionKey,
    pub service: String,
    pub topic: String,
    pub params: Option<Value>,
    /// False once an unsubscribe was requested or `Unsubscribed` was emitted
    pub active: bool,
}

struct MockSubscription {
    record: RecordedSubscription,
    handler: Option<EventHandler>,
}

struct MockState {
    requests: Vec<RecordedRequest>,
    pending: VecDeque<ReplyHandler>,
    subscriptions: BTreeMap<SubscriptionKey, MockSubscription>,
    unsubscribe_calls: Vec<SubscriptionKey>,
    next_key: u64,
    auto_reply: Option<Reply>,
    ack_unsubscribe: bool,
}

/// Recording transport double
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    /// Create a mock that parks every reply handler and acknowledges unsubscribes
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                requests: Vec::new(),
                pending: VecDeque::new(),
                subscriptions: BTreeMap::new(),
                unsubscribe_calls: Vec::new(),
                next_key: 1,
                auto_reply: None,
                ack_unsubscribe: true,
            }),
        }
    }

    /// Create a mock that answers every request immediately with `reply`
    pub fn with_auto_reply(reply: Reply) -> Self {
        let mock = Self::new();
        mock.state.lock().auto_reply = Some(reply);
        mock
    }

    /// Whether `unsubscribe` immediately delivers the `Unsubscribed` event
    pub fn set_ack_unsubscribe(&self, ack: bool) {
        self.state.lock().ack_unsubscribe = ack;
    }

    /// All requests sent so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.lock().requests.last().cloned()
    }

    /// Number of requests still waiting for a reply
    pub fn pending_replies(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Answer the oldest pending request
    pub fn reply_next(&self, reply: Option<Reply>) -> Result<(), MooError> {
        let handler = self
            .state
            .lock()
            .pending
            .pop_front()
            .ok_or(MooError::NoPendingRequest)?;
        handler(reply);
        Ok(())
    }

    /// Answer the oldest pending request with `"Success"`
    pub fn reply_success(&self, body: Option<Value>) -> Result<(), MooError> {
        self.reply_next(Some(Reply::success(body)))
    }

    /// Report a transport failure for the oldest pending request
    pub fn fail_next(&self) -> Result<(), MooError> {
        self.reply_next(None)
    }

    /// Drop the oldest pending handler without ever calling it
    pub fn drop_next(&self) -> Result<(), MooError> {
        let handler = self
            .state
            .lock()
            .pending
            .pop_front()
            .ok_or(MooError::NoPendingRequest)?;
        drop(handler);
        Ok(())
    }

    /// All subscriptions opened so far, ordered by key
    pub fn subscriptions(&self) -> Vec<RecordedSubscription> {
        self.state
            .lock()
            .subscriptions
            .values()
            .map(|s| s.record.clone())
            .collect()
    }

    pub fn subscription(&self, key: SubscriptionKey) -> Option<RecordedSubscription> {
        self.state
            .lock()
            .subscriptions
            .get(&key)
            .map(|s| s.record.clone())
    }

    pub fn last_subscription(&self) -> Option<RecordedSubscription> {
        self.state
            .lock()
            .subscriptions
            .values()
            .next_back()
            .map(|s| s.record.clone())
    }

    /// Every key passed to `unsubscribe`, including repeats
    pub fn unsubscribe_calls(&self) -> Vec<SubscriptionKey> {
        self.state.lock().unsubscribe_calls.clone()
    }

    /// Deliver an event to a subscription
    ///
    /// Emitting `Unsubscribed` ends the subscription: its handler is dropped
    /// after the call and later emits fail.
    pub fn emit(&self, key: SubscriptionKey, tag: ResponseTag, body: Value) -> Result<(), MooError> {
        let mut handler = {
            let mut state = self.state.lock();
            state
                .subscriptions
                .get_mut(&key)
                .and_then(|s| s.handler.take())
                .ok_or(MooError::UnknownSubscription(key))?
        };

        let teardown = tag == ResponseTag::Unsubscribed;
        handler(tag, body);

        let mut state = self.state.lock();
        if let Some(sub) = state.subscriptions.get_mut(&key) {
            if teardown {
                sub.record.active = false;
            } else {
                sub.handler = Some(handler);
            }
        }
        Ok(())
    }

    /// Convenience for `emit` with a tag name
    pub fn emit_named(&self, key: SubscriptionKey, tag: &str, body: Value) -> Result<(), MooError> {
        self.emit(key, ResponseTag::from_name(tag), body)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MooTransport for MockTransport {
    fn send_request(&self, name: &str, body: Option<Value>, on_reply: ReplyHandler) {
        let auto_reply = {
            let mut state = self.state.lock();
            state.requests.push(RecordedRequest {
                name: name.to_string(),
                body,
            });
            match state.auto_reply.clone() {
                Some(reply) => Some(reply),
                None => {
                    state.pending.push_back(on_reply);
                    return;
                }
            }
        };
        on_reply(auto_reply);
    }

    fn subscribe(
        &self,
        service: &str,
        topic: &str,
        params: Option<Value>,
        on_event: EventHandler,
    ) -> SubscriptionKey {
        let mut state = self.state.lock();
        let key = SubscriptionKey(state.next_key);
        state.next_key += 1;

        tracing::trace!(%key, service, topic, "mock subscription opened");

        state.subscriptions.insert(
            key,
            MockSubscription {
                record: RecordedSubscription {
                    key,
                    service: service.to_string(),
                    topic: topic.to_string(),
                    params,
                    active: true,
                },
                handler: Some(on_event),
            },
        );
        key
    }

    fn unsubscribe(&self, key: SubscriptionKey) {
        let handler = {
            let mut state = self.state.lock();
            state.unsubscribe_calls.push(key);
            let ack = state.ack_unsubscribe;

            let Some(sub) = state.subscriptions.get_mut(&key) else {
                return;
            };
            if !sub.record.active {
                return;
            }
            sub.record.active = false;

            if ack {
                sub.handler.take()
            } else {
                None
            }
        };

        if let Some(mut handler) = handler {
            handler(ResponseTag::Unsubscribed, json!({}));
        }
    }
}
