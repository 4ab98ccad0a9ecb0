// Event trigger source value object

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    Manual,
    Remote,
    IndoorMotion,
    OutdoorMotion,
}

impl TriggerSource {
    /// Fixed enumeration from the gateway protocol. Unknown codes are not an
    /// error; they resolve to no label at all.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(TriggerSource::Manual),
            1 => Some(TriggerSource::Remote),
            2 => Some(TriggerSource::IndoorMotion),
            3 => Some(TriggerSource::OutdoorMotion),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerSource::Manual => "MANUAL",
            TriggerSource::Remote => "REMOTE",
            TriggerSource::IndoorMotion => "INDOOR_MOTION",
            TriggerSource::OutdoorMotion => "OUTDOOR_MOTION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_resolve_to_labels() {
        assert_eq!(TriggerSource::from_code(0).map(|s| s.as_str()), Some("MANUAL"));
        assert_eq!(TriggerSource::from_code(1).map(|s| s.as_str()), Some("REMOTE"));
        assert_eq!(
            TriggerSource::from_code(2).map(|s| s.as_str()),
            Some("INDOOR_MOTION")
        );
        assert_eq!(
            TriggerSource::from_code(3).map(|s| s.as_str()),
            Some("OUTDOOR_MOTION")
        );
    }

    #[test]
    fn unknown_codes_resolve_to_none() {
        assert!(TriggerSource::from_code(4).is_none());
        assert!(TriggerSource::from_code(-1).is_none());
        assert!(TriggerSource::from_code(99).is_none());
    }
}
