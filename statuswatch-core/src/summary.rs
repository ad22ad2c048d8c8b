//! Summary projection: filtered subset, per-class counts, health score and
//! the system banner.
//!
//! Everything here is recomputed from scratch on each call. With a few dozen
//! services and a handful of components each there is nothing worth caching.

use serde::Serialize;

use crate::aggregate::system_status;
use crate::filter::{ComponentFilter, Favorites, SortOrder, StatusSelector};
use crate::model::ServiceStatus;
use crate::status::{StatusClass, StatusType};

/// Service counts per status class.
///
/// Every counted service lands in exactly one bucket, so
/// `operational + degraded + outage + unknown == total`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub operational: usize,
    pub degraded: usize,
    pub outage: usize,
    pub unknown: usize,
    pub total: usize,
}

impl SummaryStats {
    pub fn from_services<'a, I>(services: I) -> Self
    where
        I: IntoIterator<Item = &'a ServiceStatus>,
    {
        let mut stats = Self::default();
        for service in services {
            stats.add(service.overall_status());
        }
        stats
    }

    fn add(&mut self, status: StatusType) {
        self.total += 1;
        match status.class() {
            StatusClass::Operational => self.operational += 1,
            StatusClass::Degraded => self.degraded += 1,
            StatusClass::Outage => self.outage += 1,
            StatusClass::Unknown => self.unknown += 1,
        }
    }

    /// `round(100 * (operational*100 + degraded*50 + outage*0) / (total*100))`
    ///
    /// Unknown services count toward `total` with no credit. Rounds half up,
    /// in integer arithmetic. An empty set scores 100.
    pub fn health_score(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        let points = (self.operational * 100 + self.degraded * 50) as u64;
        let total = self.total as u64;
        ((2 * points + total) / (2 * total)) as u32
    }

    /// Share of operational services, rounded half up. An empty set is 100.
    pub fn operational_percentage(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        let op = self.operational as u64 * 100;
        let total = self.total as u64;
        ((2 * op + total) / (2 * total)) as u32
    }
}

/// Result of projecting the service list through the user's filters.
#[derive(Clone, Debug)]
pub struct SummaryView<'a> {
    /// Counts over every service that passed the component filter
    pub stats: SummaryStats,
    /// Services that passed the component filter and the status selector
    pub services: Vec<&'a ServiceStatus>,
    pub selector: Option<StatusSelector>,
}

impl<'a> SummaryView<'a> {
    /// Order the visible services. With `pin` set, services holding at least
    /// one favorite component come first; order is otherwise stable.
    pub fn arrange(mut self, sort: SortOrder, favorites: &Favorites, pin: bool) -> Self {
        sort.apply(&mut self.services);
        if pin {
            self.services
                .sort_by_key(|service| !favorites.has_favorite(service));
        }
        self
    }

    pub fn health_score(&self) -> u32 {
        self.stats.health_score()
    }
}

/// Project services through the component filter, count them, then narrow the
/// visible list by the optional status selector. Counts are taken before the
/// selector so the summary panel keeps showing every bucket.
pub fn project<'a>(
    services: &'a [ServiceStatus],
    filter: &ComponentFilter,
    selector: Option<StatusSelector>,
) -> SummaryView<'a> {
    let filtered: Vec<&ServiceStatus> = services
        .iter()
        .filter(|service| filter.includes_service(service))
        .collect();

    let stats = SummaryStats::from_services(filtered.iter().copied());

    let visible = match selector {
        Some(selector) => filtered
            .into_iter()
            .filter(|service| selector.matches(service.overall_status()))
            .collect(),
        None => filtered,
    };

    SummaryView {
        stats,
        services: visible,
        selector,
    }
}

/// System banner shown above the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total_services: usize,
    pub operational_count: usize,
    pub issue_count: usize,
    pub overall_status: StatusType,
    pub status_text: String,
    pub status_description: String,
}

pub fn status_summary(services: &[ServiceStatus]) -> StatusSummary {
    let total_services = services.len();
    let operational_count = services
        .iter()
        .filter(|s| s.overall_status() == StatusType::Operational)
        .count();
    let issue_count = total_services - operational_count;
    let overall_status = system_status(services);

    let (status_text, status_description) = match overall_status {
        StatusType::Operational => (
            "All Systems Operational".to_string(),
            "Every monitored service is operating normally.".to_string(),
        ),
        StatusType::DegradedPerformance => (
            "Degraded Performance".to_string(),
            format!("{} service(s) are experiencing degraded performance.", issue_count),
        ),
        StatusType::PartialOutage => (
            "Partial Outage".to_string(),
            format!("{} service(s) are experiencing partial outages.", issue_count),
        ),
        StatusType::MajorOutage => (
            "Major Outage".to_string(),
            format!("{} service(s) are experiencing major outages.", issue_count),
        ),
        StatusType::UnderMaintenance => (
            "Under Maintenance".to_string(),
            format!("{} service(s) are under maintenance.", issue_count),
        ),
        StatusType::Unknown => (
            "Checking Status".to_string(),
            "Service status is being checked.".to_string(),
        ),
    };

    StatusSummary {
        total_services,
        operational_count,
        issue_count,
        overall_status,
        status_text,
        status_description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComponentStatus;
    use chrono::Utc;

    fn service(name: &str, statuses: &[StatusType]) -> ServiceStatus {
        ServiceStatus {
            service_name: name.into(),
            display_name: name.to_uppercase(),
            components: statuses
                .iter()
                .enumerate()
                .map(|(i, s)| ComponentStatus::new(format!("{}", i), format!("C{}", i), *s))
                .collect(),
            page_url: String::new(),
            icon: name.into(),
            description: None,
            updated_at: Utc::now(),
            error: None,
        }
    }

    #[test]
    fn test_health_score_two_operational_one_outage() {
        let services = vec![
            service("a", &[StatusType::Operational]),
            service("b", &[StatusType::Operational]),
            service("c", &[StatusType::MajorOutage]),
        ];
        let stats = SummaryStats::from_services(&services);
        assert_eq!(stats.health_score(), 67);
    }

    #[test]
    fn test_health_score_half_credit_for_degraded() {
        let stats = SummaryStats {
            operational: 1,
            degraded: 1,
            outage: 0,
            unknown: 0,
            total: 2,
        };
        assert_eq!(stats.health_score(), 75);

        let stats = SummaryStats {
            operational: 0,
            degraded: 1,
            outage: 0,
            unknown: 0,
            total: 1,
        };
        assert_eq!(stats.health_score(), 50);
    }

    #[test]
    fn test_health_score_rounds_half_up() {
        // 1 degraded of 4: 50 / 4 = 12.5 -> 13
        let stats = SummaryStats {
            operational: 0,
            degraded: 1,
            outage: 3,
            unknown: 0,
            total: 4,
        };
        assert_eq!(stats.health_score(), 13);
    }

    #[test]
    fn test_empty_scores_full() {
        let stats = SummaryStats::default();
        assert_eq!(stats.health_score(), 100);
        assert_eq!(stats.operational_percentage(), 100);
    }

    #[test]
    fn test_unknown_gets_own_bucket() {
        let services = vec![
            service("a", &[StatusType::Operational, StatusType::Unknown]),
            service("b", &[StatusType::UnderMaintenance]),
            service("c", &[StatusType::PartialOutage]),
            service("d", &[StatusType::Operational]),
        ];
        let stats = SummaryStats::from_services(&services);
        assert_eq!(stats.operational, 1);
        assert_eq!(stats.degraded, 1);
        assert_eq!(stats.outage, 1);
        assert_eq!(stats.unknown, 1);
        assert_eq!(stats.operational + stats.degraded + stats.outage + stats.unknown, stats.total);
        assert_eq!(stats.operational_percentage(), 25);
    }

    #[test]
    fn test_project_applies_filter_then_selector() {
        let services = vec![
            service("a", &[StatusType::Operational, StatusType::MajorOutage]),
            service("b", &[StatusType::DegradedPerformance]),
            service("c", &[StatusType::Operational]),
        ];
        let mut filter = ComponentFilter::new();
        filter.set("c", "C0", false);

        let view = project(&services, &filter, None);
        assert_eq!(view.stats.total, 2);
        assert_eq!(view.stats.outage, 1);
        assert_eq!(view.stats.degraded, 1);
        assert_eq!(view.services.len(), 2);

        let view = project(&services, &filter, Some(StatusSelector::Degraded));
        assert_eq!(view.stats.total, 2);
        assert_eq!(view.services.len(), 1);
        assert_eq!(view.services[0].service_name, "b");
    }

    #[test]
    fn test_filtered_out_component_still_counts_in_aggregate() {
        // Service inclusion is decided per component, but counting uses the
        // aggregate over all components of an included service.
        let services = vec![service("a", &[StatusType::Operational, StatusType::MajorOutage])];
        let mut filter = ComponentFilter::new();
        filter.set("a", "C1", false);

        let view = project(&services, &filter, None);
        assert_eq!(view.stats.outage, 1);
    }

    #[test]
    fn test_empty_component_service_is_filtered_out() {
        let services = vec![service("empty", &[]), service("a", &[StatusType::Operational])];
        let view = project(&services, &ComponentFilter::new(), None);
        assert_eq!(view.stats.total, 1);
        assert_eq!(view.health_score(), 100);
    }

    #[test]
    fn test_arrange_pins_favorites() {
        let services = vec![
            service("a", &[StatusType::Operational]),
            service("b", &[StatusType::Operational]),
            service("c", &[StatusType::Operational]),
        ];
        let mut favorites = Favorites::new();
        favorites.toggle("c", "C0");

        let view = project(&services, &ComponentFilter::new(), None)
            .arrange(SortOrder::NameDesc, &favorites, true);
        let order: Vec<_> = view.services.iter().map(|s| s.service_name.as_str()).collect();
        assert_eq!(order, vec!["c", "b", "a"]);

        let view = project(&services, &ComponentFilter::new(), None)
            .arrange(SortOrder::NameAsc, &favorites, true);
        let order: Vec<_> = view.services.iter().map(|s| s.service_name.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_status_summary_banner() {
        let services = vec![
            service("a", &[StatusType::Operational]),
            service("b", &[StatusType::PartialOutage]),
        ];
        let summary = status_summary(&services);
        assert_eq!(summary.total_services, 2);
        assert_eq!(summary.operational_count, 1);
        assert_eq!(summary.issue_count, 1);
        assert_eq!(summary.overall_status, StatusType::PartialOutage);
        assert_eq!(summary.status_text, "Partial Outage");

        let summary = status_summary(&[]);
        assert_eq!(summary.overall_status, StatusType::Unknown);
    }
}
