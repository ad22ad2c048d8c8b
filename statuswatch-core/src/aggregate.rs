//! Worst-case status aggregation.
//!
//! The same reduction is used for components of one service and for services
//! of the whole system, so both levels obey one rule.

use crate::model::{ComponentStatus, ServiceStatus};
use crate::status::StatusType;

/// Reduce a collection of statuses to the worst case.
///
/// Priority is checked by existence, not by a numeric maximum:
/// major outage, partial outage, degraded performance, maintenance.
/// `Operational` is only returned when every input is operational; an empty
/// input, or a mix of operational and unknown, yields `Unknown`.
pub fn aggregate<I>(statuses: I) -> StatusType
where
    I: IntoIterator<Item = StatusType>,
{
    let mut seen_any = false;
    let mut major = false;
    let mut partial = false;
    let mut degraded = false;
    let mut maintenance = false;
    let mut all_operational = true;

    for status in statuses {
        seen_any = true;
        match status {
            StatusType::MajorOutage => major = true,
            StatusType::PartialOutage => partial = true,
            StatusType::DegradedPerformance => degraded = true,
            StatusType::UnderMaintenance => maintenance = true,
            StatusType::Operational => {}
            StatusType::Unknown => {}
        }
        if status != StatusType::Operational {
            all_operational = false;
        }
    }

    if !seen_any {
        return StatusType::Unknown;
    }
    if major {
        return StatusType::MajorOutage;
    }
    if partial {
        return StatusType::PartialOutage;
    }
    if degraded {
        return StatusType::DegradedPerformance;
    }
    if maintenance {
        return StatusType::UnderMaintenance;
    }
    if all_operational {
        return StatusType::Operational;
    }
    StatusType::Unknown
}

/// Status of one service from its components.
pub fn service_status(components: &[ComponentStatus]) -> StatusType {
    aggregate(components.iter().map(|c| c.status))
}

/// Status of the whole system from its services.
pub fn system_status(services: &[ServiceStatus]) -> StatusType {
    aggregate(services.iter().map(ServiceStatus::overall_status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusType::*;

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(aggregate(std::iter::empty::<StatusType>()), Unknown);
    }

    #[test]
    fn test_major_outage_dominates() {
        assert_eq!(aggregate([Operational, MajorOutage, PartialOutage]), MajorOutage);
        assert_eq!(aggregate([Unknown, MajorOutage]), MajorOutage);
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(aggregate([DegradedPerformance, PartialOutage, UnderMaintenance]), PartialOutage);
        assert_eq!(aggregate([UnderMaintenance, DegradedPerformance]), DegradedPerformance);
        assert_eq!(aggregate([Operational, UnderMaintenance]), UnderMaintenance);
    }

    #[test]
    fn test_operational_requires_unanimity() {
        assert_eq!(aggregate([Operational, Operational, Operational]), Operational);
        assert_eq!(aggregate([Operational, Unknown]), Unknown);
        assert_eq!(aggregate([Unknown]), Unknown);
    }

    #[test]
    fn test_unknown_does_not_mask_typed_severity() {
        assert_eq!(aggregate([Unknown, UnderMaintenance, Operational]), UnderMaintenance);
        assert_eq!(aggregate([Unknown, DegradedPerformance]), DegradedPerformance);
    }

    #[test]
    fn test_service_and_system_levels() {
        let healthy = vec![
            ComponentStatus::new("a", "API", Operational),
            ComponentStatus::new("b", "Web", Operational),
        ];
        let slow = vec![
            ComponentStatus::new("a", "API", Operational),
            ComponentStatus::new("b", "Web", DegradedPerformance),
        ];
        assert_eq!(service_status(&healthy), Operational);
        assert_eq!(service_status(&slow), DegradedPerformance);

        let services: Vec<ServiceStatus> = [("a", healthy), ("b", slow)]
            .into_iter()
            .map(|(name, components)| ServiceStatus {
                service_name: name.into(),
                display_name: name.into(),
                components,
                page_url: String::new(),
                icon: name.into(),
                description: None,
                updated_at: chrono::Utc::now(),
                error: None,
            })
            .collect();
        assert_eq!(system_status(&services), DegradedPerformance);
    }

    #[test]
    fn test_vendor_token_through_aggregate() {
        let components = vec![
            ComponentStatus::new("a", "API", crate::status::map_status_to_type("minor_outage")),
            ComponentStatus::new("b", "Web", crate::status::map_status_to_type("operational")),
        ];
        assert_eq!(components[0].status, PartialOutage);
        assert_eq!(service_status(&components), PartialOutage);
    }
}
