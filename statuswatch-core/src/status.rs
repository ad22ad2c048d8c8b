//! Canonical status taxonomy and the vendor vocabulary mapper.
//!
//! Every vendor speaks its own dialect (`none`, `minor`, `critical`,
//! `degraded_performance`, ...). The only place those raw tokens are ever
//! compared is [`map_status_to_type`]; everything downstream works with
//! [`StatusType`].

use serde::{Deserialize, Serialize};

/// Canonical status of a component, service or the whole system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusType {
    Operational,
    DegradedPerformance,
    PartialOutage,
    MajorOutage,
    UnderMaintenance,
    #[default]
    Unknown,
}

impl StatusType {
    /// All variants, most severe first, `Unknown` last.
    pub const ALL: [StatusType; 6] = [
        StatusType::MajorOutage,
        StatusType::PartialOutage,
        StatusType::DegradedPerformance,
        StatusType::UnderMaintenance,
        StatusType::Operational,
        StatusType::Unknown,
    ];

    /// Canonical snake_case token, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::DegradedPerformance => "degraded_performance",
            Self::PartialOutage => "partial_outage",
            Self::MajorOutage => "major_outage",
            Self::UnderMaintenance => "under_maintenance",
            Self::Unknown => "unknown",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Operational => "Operational",
            Self::DegradedPerformance => "Degraded Performance",
            Self::PartialOutage => "Partial Outage",
            Self::MajorOutage => "Major Outage",
            Self::UnderMaintenance => "Under Maintenance",
            Self::Unknown => "Unknown",
        }
    }

    pub fn class(&self) -> StatusClass {
        match self {
            Self::Operational => StatusClass::Operational,
            Self::DegradedPerformance | Self::UnderMaintenance => StatusClass::Degraded,
            Self::PartialOutage | Self::MajorOutage => StatusClass::Outage,
            Self::Unknown => StatusClass::Unknown,
        }
    }

    pub fn is_outage(&self) -> bool {
        matches!(self, Self::PartialOutage | Self::MajorOutage)
    }
}

impl std::fmt::Display for StatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary-panel bucket a status falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    Operational,
    /// Degraded performance or maintenance
    Degraded,
    /// Partial or major outage
    Outage,
    Unknown,
}

/// Convert one vendor status token into a [`StatusType`].
///
/// Total over all strings. Lookup is case-insensitive and ignores surrounding
/// whitespace. Tokens that are not in the table map to `Unknown`, never to a
/// healthy or an outage state.
pub fn map_status_to_type(token: &str) -> StatusType {
    match token.trim().to_lowercase().as_str() {
        "operational" | "none" => StatusType::Operational,
        "degraded_performance" | "minor" => StatusType::DegradedPerformance,
        "partial_outage" | "minor_outage" => StatusType::PartialOutage,
        "major_outage" | "critical" => StatusType::MajorOutage,
        "under_maintenance" | "maintenance" => StatusType::UnderMaintenance,
        _ => StatusType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_vendor_synonyms() {
        assert_eq!(map_status_to_type("operational"), StatusType::Operational);
        assert_eq!(map_status_to_type("none"), StatusType::Operational);
        assert_eq!(map_status_to_type("degraded_performance"), StatusType::DegradedPerformance);
        assert_eq!(map_status_to_type("minor"), StatusType::DegradedPerformance);
        assert_eq!(map_status_to_type("partial_outage"), StatusType::PartialOutage);
        assert_eq!(map_status_to_type("minor_outage"), StatusType::PartialOutage);
        assert_eq!(map_status_to_type("major_outage"), StatusType::MajorOutage);
        assert_eq!(map_status_to_type("critical"), StatusType::MajorOutage);
        assert_eq!(map_status_to_type("under_maintenance"), StatusType::UnderMaintenance);
        assert_eq!(map_status_to_type("maintenance"), StatusType::UnderMaintenance);
    }

    #[test]
    fn test_unrecognized_is_unknown() {
        assert_eq!(map_status_to_type(""), StatusType::Unknown);
        assert_eq!(map_status_to_type("invalid_status"), StatusType::Unknown);
        assert_eq!(map_status_to_type("major"), StatusType::Unknown);
        assert_eq!(map_status_to_type("✓ all good"), StatusType::Unknown);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(map_status_to_type("OPERATIONAL"), StatusType::Operational);
        assert_eq!(map_status_to_type("Operational"), StatusType::Operational);
        assert_eq!(map_status_to_type(" Critical \n"), StatusType::MajorOutage);
    }

    #[test]
    fn test_canonical_tokens_map_to_themselves() {
        for status in StatusType::ALL {
            assert_eq!(map_status_to_type(status.as_str()), status);
        }
    }

    #[test]
    fn test_serde_uses_snake_case_tokens() {
        let json = serde_json::to_string(&StatusType::DegradedPerformance).unwrap();
        assert_eq!(json, "\"degraded_performance\"");
        let back: StatusType = serde_json::from_str("\"under_maintenance\"").unwrap();
        assert_eq!(back, StatusType::UnderMaintenance);
    }

    #[test]
    fn test_classes() {
        assert_eq!(StatusType::UnderMaintenance.class(), StatusClass::Degraded);
        assert_eq!(StatusType::PartialOutage.class(), StatusClass::Outage);
        assert_eq!(StatusType::Unknown.class(), StatusClass::Unknown);
    }
}
