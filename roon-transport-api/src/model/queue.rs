//! Play queue items

use serde::{Deserialize, Serialize};

use super::{OneLine, ThreeLine, TwoLine};

/// One entry of a zone's play queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Identifier accepted by `play_from_here`
    pub queue_item_id: u64,
    /// Length in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_key: Option<String>,
    #[serde(default)]
    pub one_line: OneLine,
    #[serde(default)]
    pub two_line: TwoLine,
    #[serde(default)]
    pub three_line: ThreeLine,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_queue_item_decodes() {
        let item: QueueItem = serde_json::from_value(json!({
            "queue_item_id": 1029,
            "length": 215.5,
            "one_line": {"line1": "Lost - Frank Ocean"},
            "two_line": {"line1": "Lost", "line2": "Frank Ocean"}
        }))
        .unwrap();

        assert_eq!(item.queue_item_id, 1029);
        assert_eq!(item.length, Some(215.5));
        assert_eq!(item.two_line.line2.as_deref(), Some("Frank Ocean"));
        assert!(item.image_key.is_none());
    }
}
