// Events surfaced by the gateway channel

use serde_json::Value;

/// Everything the connection layer reports to the lifecycle loop.
#[derive(Debug)]
pub enum ChannelEvent {
    Connected,
    Disconnected { reason: String },
    Push { kind: PushKind, payload: Value },
}

/// Named push notifications emitted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushKind {
    UserUpdate,
    UserEventUpdate,
    UserDeviceUpdate,
    DeviceUpdate,
    DeviceEventUpdate,
    EventUpdate,
    Other(String),
}

impl PushKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "userUpdate" => PushKind::UserUpdate,
            "userEventUpdate" => PushKind::UserEventUpdate,
            "userDeviceUpdate" => PushKind::UserDeviceUpdate,
            "deviceUpdate" => PushKind::DeviceUpdate,
            "deviceEventUpdate" => PushKind::DeviceEventUpdate,
            "eventUpdate" => PushKind::EventUpdate,
            other => PushKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PushKind::UserUpdate => "userUpdate",
            PushKind::UserEventUpdate => "userEventUpdate",
            PushKind::UserDeviceUpdate => "userDeviceUpdate",
            PushKind::DeviceUpdate => "deviceUpdate",
            PushKind::DeviceEventUpdate => "deviceEventUpdate",
            PushKind::EventUpdate => "eventUpdate",
            PushKind::Other(name) => name,
        }
    }

    /// Both event-update kinds funnel into the same enrichment handler; the
    /// kind only shows up in logs.
    pub fn triggers_enrichment(&self) -> bool {
        matches!(self, PushKind::DeviceEventUpdate | PushKind::EventUpdate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_round_trip() {
        for name in [
            "userUpdate",
            "userEventUpdate",
            "userDeviceUpdate",
            "deviceUpdate",
            "deviceEventUpdate",
            "eventUpdate",
        ] {
            assert_eq!(PushKind::from_name(name).as_str(), name);
        }
    }

    #[test]
    fn only_event_updates_trigger_enrichment() {
        assert!(PushKind::DeviceEventUpdate.triggers_enrichment());
        assert!(PushKind::EventUpdate.triggers_enrichment());
        assert!(!PushKind::DeviceUpdate.triggers_enrichment());
        assert!(!PushKind::Other("somethingElse".to_string()).triggers_enrichment());
    }
}
