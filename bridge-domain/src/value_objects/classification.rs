// Event classification value object

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClassification {
    Unknown,
    Clear,
    Suspicious,
    Contraband,
    HumanActivity,
    RemoteUnlock,
}

impl EventClassification {
    /// Fixed enumeration from the gateway protocol. Note the gap: 10 is
    /// REMOTE_UNLOCK, 5..=9 are unassigned.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(EventClassification::Unknown),
            1 => Some(EventClassification::Clear),
            2 => Some(EventClassification::Suspicious),
            3 => Some(EventClassification::Contraband),
            4 => Some(EventClassification::HumanActivity),
            10 => Some(EventClassification::RemoteUnlock),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventClassification::Unknown => "UNKNOWN",
            EventClassification::Clear => "CLEAR",
            EventClassification::Suspicious => "SUSPICIOUS",
            EventClassification::Contraband => "CONTRABAND",
            EventClassification::HumanActivity => "HUMAN_ACTIVITY",
            EventClassification::RemoteUnlock => "REMOTE_UNLOCK",
        }
    }
}
