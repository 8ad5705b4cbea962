//! Reply and event envelope types

use serde_json::Value;
use std::fmt;

/// Reply name the service uses to signal a successful request
pub const SUCCESS: &str = "Success";

/// A single named reply to a request
///
/// The name is `"Success"` for completed requests; anything else is the
/// service's own error name (e.g. `"InvalidRequest"`, `"ZoneNotFound"`).
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Reply name
    pub name: String,
    /// Optional JSON body
    pub body: Option<Value>,
}

impl Reply {
    /// Create a reply with the given name and body
    pub fn new(name: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }

    /// Create a `"Success"` reply
    pub fn success(body: Option<Value>) -> Self {
        Self::new(SUCCESS, body)
    }

    /// Create a named error reply without a body
    pub fn error(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    /// Whether this reply carries the success sentinel
    pub fn is_success(&self) -> bool {
        self.name == SUCCESS
    }
}

/// Response tag attached to every subscription event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResponseTag {
    /// Subscription acknowledged; the body is a full snapshot
    Subscribed,
    /// Incremental update
    Changed,
    /// Subscription torn down
    Unsubscribed,
    /// Any tag this client does not know about
    Other(String),
}

impl ResponseTag {
    /// Parse a tag from its wire name
    pub fn from_name(name: &str) -> Self {
        match name {
            "Subscribed" => ResponseTag::Subscribed,
            "Changed" => ResponseTag::Changed,
            "Unsubscribed" => ResponseTag::Unsubscribed,
            other => ResponseTag::Other(other.to_string()),
        }
    }

    /// Wire name of this tag
    pub fn as_str(&self) -> &str {
        match self {
            ResponseTag::Subscribed => "Subscribed",
            ResponseTag::Changed => "Changed",
            ResponseTag::Unsubscribed => "Unsubscribed",
            ResponseTag::Other(name) => name,
        }
    }
}

impl fmt::Display for ResponseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ResponseTag {
    fn from(name: &str) -> Self {
        ResponseTag::from_name(name)
    }
}

/// Transport-assigned key identifying one live subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionKey(pub u64);

impl fmt::Display for SubscriptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_success() {
        let reply = Reply::success(Some(json!({"zones": []})));
        assert!(reply.is_success());
        assert_eq!(reply.name, "Success");
    }

    #[test]
    fn test_reply_error_is_not_success() {
        let reply = Reply::error("InvalidRequest");
        assert!(!reply.is_success());
        assert!(reply.body.is_none());
    }

    #[test]
    fn test_success_match_is_exact() {
        assert!(!Reply::error("success").is_success());
        assert!(!Reply::error("Successful").is_success());
    }

    #[test]
    fn test_response_tag_round_trip_names() {
        for name in ["Subscribed", "Changed", "Unsubscribed"] {
            assert_eq!(ResponseTag::from_name(name).as_str(), name);
        }
    }

    #[test]
    fn test_response_tag_unknown() {
        let tag = ResponseTag::from_name("Paused");
        assert_eq!(tag, ResponseTag::Other("Paused".to_string()));
        assert_eq!(format!("{}", tag), "Paused");
    }

    #[test]
    fn test_subscription_key_display() {
        assert_eq!(SubscriptionKey(7).to_string(), "7");
    }
}
