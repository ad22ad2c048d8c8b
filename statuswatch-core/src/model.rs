use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::aggregate;
use crate::status::StatusType;

/// Stable lowercase slug of a monitored platform, e.g. `"openai"`.
pub type ServiceId = String;

/// One monitored sub-capability of a platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentStatus {
    /// Vendor-assigned id, unique within its service
    pub id: String,
    pub name: String,
    pub status: StatusType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ComponentStatus {
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: StatusType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            description: None,
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Snapshot of one platform as produced by a single poll.
///
/// The component list is replaced wholesale on every poll. The overall status
/// is never stored; it is derived from the components on every read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub service_name: ServiceId,
    pub display_name: String,
    pub components: Vec<ComponentStatus>,
    pub page_url: String,
    /// Key into the icon table of the presentation layer
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
    /// Set when this snapshot stands in for a failed poll
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceStatus {
    pub fn overall_status(&self) -> StatusType {
        aggregate(self.components.iter().map(|c| c.status))
    }

    /// Placeholder used when a poll fails: a single unknown component that
    /// carries the failure reason, so the service shows up as unknown instead
    /// of disappearing or keeping a stale healthy state.
    pub fn unavailable(
        service_name: impl Into<ServiceId>,
        display_name: impl Into<String>,
        page_url: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let service_name = service_name.into();
        let reason = reason.into();
        Self {
            components: vec![
                ComponentStatus::new(
                    format!("{}-unavailable", service_name),
                    "Status unavailable",
                    StatusType::Unknown,
                )
                .with_description(reason.clone()),
            ],
            icon: service_name.clone(),
            service_name,
            display_name: display_name.into(),
            page_url: page_url.into(),
            description: None,
            updated_at: Utc::now(),
            error: Some(reason),
        }
    }

    pub fn component(&self, name: &str) -> Option<&ComponentStatus> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn is_placeholder(&self) -> bool {
        self.error.is_some()
    }
}
