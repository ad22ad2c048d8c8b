//! Status transitions that deserve a notification.
//!
//! Only two kinds of change are announced: entering an outage and recovering
//! to operational. Everything else (degraded to maintenance, unknown to
//! degraded, ...) is silent.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{ServiceId, ServiceStatus};
use crate::status::StatusType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Outage,
    Recovery,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub service_name: ServiceId,
    pub display_name: String,
    pub previous: StatusType,
    pub current: StatusType,
    pub kind: NotificationKind,
}

impl StatusChange {
    pub fn title(&self) -> &'static str {
        match self.kind {
            NotificationKind::Outage => "Service Outage",
            NotificationKind::Recovery => "Service Recovered",
        }
    }

    pub fn message(&self) -> String {
        match self.kind {
            NotificationKind::Outage => format!(
                "{} is experiencing {}.",
                self.display_name,
                self.current.label()
            ),
            NotificationKind::Recovery => {
                format!("{} has recovered and is now operational.", self.display_name)
            }
        }
    }
}

pub fn classify_transition(previous: StatusType, current: StatusType) -> Option<NotificationKind> {
    if previous == current {
        return None;
    }
    if current.is_outage() {
        return Some(NotificationKind::Outage);
    }
    if current == StatusType::Operational {
        return Some(NotificationKind::Recovery);
    }
    None
}

/// Remembers the last aggregated status of each service so successive polls
/// can be diffed.
#[derive(Clone, Debug, Default)]
pub struct TransitionTracker {
    previous: BTreeMap<ServiceId, StatusType>,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare against the previous observation and remember the new one.
    /// The first observation of a service only establishes its baseline.
    pub fn observe(&mut self, service: &ServiceStatus) -> Option<StatusChange> {
        let current = service.overall_status();
        let previous = self.previous.insert(service.service_name.clone(), current)?;
        let kind = classify_transition(previous, current)?;
        Some(StatusChange {
            service_name: service.service_name.clone(),
            display_name: service.display_name.clone(),
            previous,
            current,
            kind,
        })
    }

    /// Observe a whole poll cycle and return the changes worth announcing.
    pub fn observe_all(&mut self, services: &[ServiceStatus]) -> Vec<StatusChange> {
        services.iter().filter_map(|s| self.observe(s)).collect()
    }

    pub fn last_status(&self, service: &str) -> Option<StatusType> {
        self.previous.get(service).copied()
    }
}
