//! User-controlled predicates over services: component inclusion, favorites,
//! status-class narrowing and sort order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ServiceStatus;
use crate::status::{StatusClass, StatusType};

/// `{ service_name: { component_name: flag } }`
pub type ComponentFlags = BTreeMap<String, BTreeMap<String, bool>>;

/// Component-level inclusion filter. Entries that are absent default to
/// included, so components that appear (or get renamed) upstream are visible
/// until the user opts them out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentFilter(pub ComponentFlags);

impl ComponentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_included(&self, service: &str, component: &str) -> bool {
        self.0
            .get(service)
            .and_then(|components| components.get(component))
            .copied()
            .unwrap_or(true)
    }

    pub fn set(&mut self, service: &str, component: &str, included: bool) {
        self.0
            .entry(service.to_string())
            .or_default()
            .insert(component.to_string(), included);
    }

    /// A service passes when at least one of its components is included.
    pub fn includes_service(&self, service: &ServiceStatus) -> bool {
        service
            .components
            .iter()
            .any(|c| self.is_included(&service.service_name, &c.name))
    }
}

/// Favorite components. Entries that are absent default to not favorite.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(pub ComponentFlags);

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_favorite(&self, service: &str, component: &str) -> bool {
        self.0
            .get(service)
            .and_then(|components| components.get(component))
            .copied()
            .unwrap_or(false)
    }

    /// Flip one component and return its new state.
    pub fn toggle(&mut self, service: &str, component: &str) -> bool {
        let entry = self
            .0
            .entry(service.to_string())
            .or_default()
            .entry(component.to_string())
            .or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn set(&mut self, service: &str, component: &str, favorite: bool) {
        self.0
            .entry(service.to_string())
            .or_default()
            .insert(component.to_string(), favorite);
    }

    pub fn has_favorite(&self, service: &ServiceStatus) -> bool {
        service
            .components
            .iter()
            .any(|c| self.is_favorite(&service.service_name, &c.name))
    }
}

/// Optional narrowing of the visible list by status class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSelector {
    /// Degraded performance or maintenance
    Degraded,
    /// Partial or major outage
    Outage,
}

impl StatusSelector {
    pub fn matches(&self, status: StatusType) -> bool {
        match self {
            Self::Degraded => status.class() == StatusClass::Degraded,
            Self::Outage => status.class() == StatusClass::Outage,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Degraded => "DEGRADED",
            Self::Outage => "OUTAGE",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Catalog order
    #[default]
    Default,
    NameAsc,
    NameDesc,
}

impl SortOrder {
    pub fn cycle(self) -> Self {
        match self {
            Self::Default => Self::NameAsc,
            Self::NameAsc => Self::NameDesc,
            Self::NameDesc => Self::Default,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::NameAsc => "name ↑",
            Self::NameDesc => "name ↓",
        }
    }

    /// Stable sort by display name, case-insensitive.
    pub fn apply(&self, services: &mut [&ServiceStatus]) {
        match self {
            Self::Default => {}
            Self::NameAsc => services.sort_by_key(|s| s.display_name.to_lowercase()),
            Self::NameDesc => {
                services.sort_by(|a, b| {
                    b.display_name
                        .to_lowercase()
                        .cmp(&a.display_name.to_lowercase())
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComponentStatus;
    use chrono::Utc;

    fn service(name: &str, display: &str, components: &[&str]) -> ServiceStatus {
        ServiceStatus {
            service_name: name.into(),
            display_name: display.into(),
            components: components
                .iter()
                .map(|c| ComponentStatus::new(*c, *c, StatusType::Operational))
                .collect(),
            page_url: String::new(),
            icon: name.into(),
            description: None,
            updated_at: Utc::now(),
            error: None,
        }
    }

    #[test]
    fn test_filter_defaults_to_included() {
        let filter = ComponentFilter::new();
        assert!(filter.is_included("openai", "API"));
    }

    #[test]
    fn test_service_included_while_any_component_included() {
        let svc = service("openai", "OpenAI", &["A", "B"]);
        let mut filter = ComponentFilter::new();

        filter.set("openai", "A", true);
        filter.set("openai", "B", false);
        assert!(filter.includes_service(&svc));

        filter.set("openai", "A", false);
        assert!(!filter.includes_service(&svc));
    }

    #[test]
    fn test_orphaned_filter_entries_are_ignored() {
        let svc = service("openai", "OpenAI", &["API"]);
        let mut filter = ComponentFilter::new();
        filter.set("openai", "Old Name", false);
        assert!(filter.includes_service(&svc));
    }

    #[test]
    fn test_favorites_toggle() {
        let svc = service("github", "GitHub", &["Git", "Actions"]);
        let mut favorites = Favorites::new();
        assert!(!favorites.has_favorite(&svc));

        assert!(favorites.toggle("github", "Actions"));
        assert!(favorites.has_favorite(&svc));

        assert!(!favorites.toggle("github", "Actions"));
        assert!(!favorites.has_favorite(&svc));
    }

    #[test]
    fn test_selector_matches_classes() {
        assert!(StatusSelector::Degraded.matches(StatusType::UnderMaintenance));
        assert!(StatusSelector::Degraded.matches(StatusType::DegradedPerformance));
        assert!(!StatusSelector::Degraded.matches(StatusType::PartialOutage));
        assert!(StatusSelector::Outage.matches(StatusType::MajorOutage));
        assert!(!StatusSelector::Outage.matches(StatusType::Unknown));
    }

    #[test]
    fn test_sort_order() {
        let a = service("b", "beta", &[]);
        let b = service("a", "Alpha", &[]);
        let c = service("c", "Gamma", &[]);

        let mut list = vec![&a, &b, &c];
        SortOrder::NameAsc.apply(&mut list);
        let names: Vec<_> = list.iter().map(|s| s.display_name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "Gamma"]);

        SortOrder::NameDesc.apply(&mut list);
        let names: Vec<_> = list.iter().map(|s| s.display_name.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "beta", "Alpha"]);

        assert_eq!(SortOrder::NameDesc.cycle(), SortOrder::Default);
    }
}
