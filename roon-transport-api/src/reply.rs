//! Reply normalization and the single-resolution command future

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use moo_client::Reply;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::ApiError;

/// Map a transport reply onto the command result contract
///
/// `"Success"` yields the reply body, any other name surfaces verbatim as
/// [`ApiError::Protocol`], and a missing reply is a [`ApiError::NetworkError`].
pub fn normalize_reply(reply: Option<Reply>) -> Result<Option<Value>, ApiError> {
    match reply {
        Some(reply) if reply.is_success() => Ok(reply.body),
        Some(reply) => Err(ApiError::Protocol(reply.name)),
        None => Err(ApiError::NetworkError),
    }
}

/// Future resolving once with the outcome of a command
///
/// The request has already been sent when a `PendingReply` is returned;
/// awaiting it only waits for the reply. Dropping it does not cancel the
/// request. Commands rejected before sending return an already-resolved
/// `PendingReply`.
#[must_use = "the reply is lost unless the future is awaited"]
pub struct PendingReply<T> {
    state: PendingState<T>,
}

enum PendingState<T> {
    Ready(Option<Result<T, ApiError>>),
    Waiting(oneshot::Receiver<Result<T, ApiError>>),
}

impl<T> PendingReply<T> {
    /// An already-resolved reply
    pub fn ready(result: Result<T, ApiError>) -> Self {
        Self {
            state: PendingState::Ready(Some(result)),
        }
    }

    /// A reply completed through the returned sender
    ///
    /// Dropping the sender without sending resolves with `NetworkError`.
    pub(crate) fn channel() -> (oneshot::Sender<Result<T, ApiError>>, Self) {
        let (tx, rx) = oneshot::channel();
        (
            tx,
            Self {
                state: PendingState::Waiting(rx),
            },
        )
    }

    /// Whether the reply was decided without contacting the service
    pub fn is_ready(&self) -> bool {
        matches!(self.state, PendingState::Ready(_))
    }
}

// The result is never pinned structurally.
impl<T> Unpin for PendingReply<T> {}

impl<T> Future for PendingReply<T> {
    type Output = Result<T, ApiError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.state {
            PendingState::Ready(result) => {
                Poll::Ready(result.take().unwrap_or(Err(ApiError::NetworkError)))
            }
            PendingState::Waiting(rx) => Pin::new(rx)
                .poll(cx)
                .map(|received| received.unwrap_or(Err(ApiError::NetworkError))),
        }
    }
}

impl<T> std::fmt::Debug for PendingReply<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingReply")
            .field("ready", &self.is_ready())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_success() {
        let body = normalize_reply(Some(Reply::success(Some(json!({"zones": []}))))).unwrap();
        assert_eq!(body, Some(json!({"zones": []})));
    }

    #[test]
    fn test_normalize_error_name_verbatim() {
        let error = normalize_reply(Some(Reply::error("ZoneNotFound"))).unwrap_err();
        assert_eq!(error, ApiError::Protocol("ZoneNotFound".to_string()));
        assert_eq!(error.code(), "ZoneNotFound");
    }

    #[test]
    fn test_normalize_missing_reply() {
        assert_eq!(normalize_reply(None), Err(ApiError::NetworkError));
    }

    #[tokio::test]
    async fn test_ready_reply_resolves_immediately() {
        let pending = PendingReply::ready(Err::<(), _>(ApiError::MissingTarget("output")));
        assert!(pending.is_ready());
        assert_eq!(pending.await, Err(ApiError::MissingTarget("output")));
    }

    #[tokio::test]
    async fn test_channel_reply() {
        let (tx, pending) = PendingReply::channel();
        assert!(!pending.is_ready());
        tx.send(Ok(5)).unwrap();
        assert_eq!(pending.await, Ok(5));
    }

    #[tokio::test]
    async fn test_dropped_sender_is_network_error() {
        let (tx, pending) = PendingReply::<()>::channel();
        drop(tx);
        assert_eq!(pending.await, Err(ApiError::NetworkError));
    }
}
