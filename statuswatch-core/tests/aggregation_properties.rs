use chrono::Utc;
use proptest::prelude::*;
use statuswatch_core::aggregate::aggregate;
use statuswatch_core::filter::ComponentFilter;
use statuswatch_core::model::{ComponentStatus, ServiceStatus};
use statuswatch_core::status::{StatusType, map_status_to_type};
use statuswatch_core::summary::{SummaryStats, project};

fn status_strategy() -> impl Strategy<Value = StatusType> {
    prop_oneof![
        Just(StatusType::Operational),
        Just(StatusType::DegradedPerformance),
        Just(StatusType::PartialOutage),
        Just(StatusType::MajorOutage),
        Just(StatusType::UnderMaintenance),
        Just(StatusType::Unknown),
    ]
}

fn service(index: usize, statuses: &[StatusType]) -> ServiceStatus {
    ServiceStatus {
        service_name: format!("svc-{index}"),
        display_name: format!("Service {index}"),
        components: statuses
            .iter()
            .enumerate()
            .map(|(i, s)| ComponentStatus::new(format!("c{i}"), format!("C{i}"), *s))
            .collect(),
        page_url: String::new(),
        icon: String::new(),
        description: None,
        updated_at: Utc::now(),
        error: None,
    }
}

proptest! {
    #[test]
    fn mapper_is_total(token in ".*") {
        let status = map_status_to_type(&token);
        prop_assert!(StatusType::ALL.contains(&status));
    }

    #[test]
    fn mapper_ignores_case(token in prop_oneof![
        Just("operational"), Just("none"), Just("minor"), Just("critical"),
        Just("partial_outage"), Just("maintenance"), Just("bogus"),
    ], upper in any::<bool>()) {
        let variant = if upper { token.to_uppercase() } else { token.to_string() };
        prop_assert_eq!(map_status_to_type(&variant), map_status_to_type(token));
    }

    #[test]
    fn major_outage_dominates_any_permutation(
        mut statuses in proptest::collection::vec(status_strategy(), 0..16),
        position in any::<prop::sample::Index>(),
    ) {
        let at = position.index(statuses.len() + 1);
        statuses.insert(at, StatusType::MajorOutage);
        prop_assert_eq!(aggregate(statuses.iter().copied()), StatusType::MajorOutage);

        statuses.reverse();
        prop_assert_eq!(aggregate(statuses.iter().copied()), StatusType::MajorOutage);
    }

    #[test]
    fn aggregate_is_order_independent(statuses in proptest::collection::vec(status_strategy(), 0..16)) {
        let mut sorted = statuses.clone();
        sorted.sort_by_key(|s| s.as_str());
        prop_assert_eq!(aggregate(statuses), aggregate(sorted));
    }

    #[test]
    fn nested_partitions_agree(
        statuses in proptest::collection::vec(status_strategy(), 1..24),
        cuts in proptest::collection::vec(any::<prop::sample::Index>(), 0..4),
    ) {
        let mut bounds: Vec<usize> = cuts.iter().map(|c| c.index(statuses.len())).collect();
        bounds.push(0);
        bounds.push(statuses.len());
        bounds.sort_unstable();
        bounds.dedup();

        let inner: Vec<StatusType> = bounds
            .windows(2)
            .map(|w| aggregate(statuses[w[0]..w[1]].iter().copied()))
            .collect();

        prop_assert_eq!(aggregate(inner), aggregate(statuses.iter().copied()));
    }

    #[test]
    fn summary_buckets_partition_total(
        services in proptest::collection::vec(
            proptest::collection::vec(status_strategy(), 0..6),
            0..20,
        ),
    ) {
        let services: Vec<ServiceStatus> = services
            .iter()
            .enumerate()
            .map(|(i, s)| service(i, s))
            .collect();

        let stats = SummaryStats::from_services(&services);
        prop_assert_eq!(
            stats.operational + stats.degraded + stats.outage + stats.unknown,
            stats.total
        );
        prop_assert!(stats.health_score() <= 100);

        let view = project(&services, &ComponentFilter::new(), None);
        let non_empty = services.iter().filter(|s| !s.components.is_empty()).count();
        prop_assert_eq!(view.stats.total, non_empty);
    }
}
