/// Name of the transport service on a core
pub const SERVICE_NAME: &str = "com.roonlabs.transport:2";

/// Subscription topics of the transport service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Zone snapshots and deltas
    Zones,
    /// Output snapshots and deltas
    Outputs,
    /// Play queue of one zone or output
    Queue,
}

impl Topic {
    /// Get the wire name of this topic
    pub fn name(&self) -> &'static str {
        match self {
            Topic::Zones => "zones",
            Topic::Outputs => "outputs",
            Topic::Queue => "queue",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_names() {
        assert_eq!(Topic::Zones.name(), "zones");
        assert_eq!(Topic::Outputs.name(), "outputs");
        assert_eq!(Topic::Queue.to_string(), "queue");
    }
}
