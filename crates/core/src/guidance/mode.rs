//! Mission mode definitions

/// Top-level mission mode
///
/// Discriminants match the `GDN_MODE` parameter and the ground command values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum MissionMode {
    /// Follow the waypoint graph through the tack planner
    Waypoints = 0,
    /// Hold a fixed heading, planner bypassed
    #[default]
    Heading = 1,
    /// Sail to the recovery point through the tack planner
    Recovery = 2,
    /// Rudder and sail driven by override commands only
    Manual = 3,
}

impl MissionMode {
    /// Map a raw mode value
    ///
    /// Any value outside the enumeration selects `Recovery`. This is the
    /// fail-safe arm: a corrupted or unknown command brings the boat home.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => MissionMode::Waypoints,
            1 => MissionMode::Heading,
            3 => MissionMode::Manual,
            _ => MissionMode::Recovery,
        }
    }

    /// Telemetry label
    pub fn label(self) -> &'static str {
        match self {
            MissionMode::Waypoints => "WAYPOINT",
            MissionMode::Heading => "HEADING",
            MissionMode::Recovery => "RECOVERY",
            MissionMode::Manual => "MANUAL",
        }
    }

    /// True if the mode steers through the tack planner
    pub fn uses_planner(self) -> bool {
        matches!(self, MissionMode::Waypoints | MissionMode::Recovery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u8_known_values() {
        assert_eq!(MissionMode::from_u8(0), MissionMode::Waypoints);
        assert_eq!(MissionMode::from_u8(1), MissionMode::Heading);
        assert_eq!(MissionMode::from_u8(2), MissionMode::Recovery);
        assert_eq!(MissionMode::from_u8(3), MissionMode::Manual);
    }

    #[test]
    fn test_from_u8_unknown_falls_back_to_recovery() {
        for raw in [4u8, 7, 100, 255] {
            assert_eq!(MissionMode::from_u8(raw), MissionMode::Recovery);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(MissionMode::Waypoints.label(), "WAYPOINT");
        assert_eq!(MissionMode::Heading.label(), "HEADING");
        assert_eq!(MissionMode::Recovery.label(), "RECOVERY");
        assert_eq!(MissionMode::Manual.label(), "MANUAL");
    }

    #[test]
    fn test_planner_modes() {
        assert!(MissionMode::Waypoints.uses_planner());
        assert!(MissionMode::Recovery.uses_planner());
        assert!(!MissionMode::Heading.uses_planner());
        assert!(!MissionMode::Manual.uses_planner());
    }
}
