//! Decoding of vendor status payloads into normalized components.
//!
//! Most vendors host an Atlassian Statuspage with a `status.json` indicator
//! endpoint and a `components.json` endpoint; Heroku has its own
//! `current-status` color feed. Raw tokens go through
//! [`map_status_to_type`] and nowhere else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ComponentStatus;
use crate::status::{StatusType, map_status_to_type};

#[derive(Debug, Error)]
pub enum VendorError {
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload has no {0}")]
    Missing(&'static str),
}

/// Shape of a vendor feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    /// `status.json`: one page-wide indicator applied to every configured component
    StatuspageIndicator,
    /// `components.json` / `summary.json`: per-component statuses
    #[default]
    StatuspageComponents,
    /// Heroku `current-status`: green/yellow/red per system
    Heroku,
}

#[derive(Debug, Deserialize)]
struct IndicatorPayload {
    status: Option<Indicator>,
}

#[derive(Debug, Deserialize)]
struct Indicator {
    indicator: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ComponentsPayload {
    components: Option<Vec<RawComponent>>,
}

#[derive(Debug, Deserialize)]
struct RawComponent {
    id: String,
    name: String,
    status: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    group_id: Option<String>,
    #[serde(default)]
    group: Option<bool>,
}

impl RawComponent {
    fn is_group(&self) -> bool {
        self.group.unwrap_or(false)
    }

    fn into_component(self) -> ComponentStatus {
        ComponentStatus {
            status: map_status_to_type(&self.status),
            id: self.id,
            name: self.name,
            description: self.description,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HerokuPayload {
    status: Option<Vec<HerokuSystem>>,
}

#[derive(Debug, Deserialize)]
struct HerokuSystem {
    system: String,
    status: String,
}

/// Heroku reports colors, not words.
fn heroku_color_token(color: &str) -> &'static str {
    match color.trim().to_lowercase().as_str() {
        "green" => "operational",
        "yellow" => "degraded_performance",
        "red" => "major_outage",
        _ => "unknown",
    }
}

/// Slug a display name into a stable component id.
fn slug_id(service: &str, name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("{}-{}", service, slug.trim_matches('-'))
}

/// Decode a payload of the given kind.
///
/// `components` names the components an indicator feed fans out to;
/// `include` restricts a components feed to the listed names when non-empty.
pub fn decode(
    kind: FeedKind,
    service: &str,
    body: &[u8],
    components: &[String],
    include: &[String],
) -> Result<Vec<ComponentStatus>, VendorError> {
    match kind {
        FeedKind::StatuspageIndicator => decode_indicator(service, body, components),
        FeedKind::StatuspageComponents => decode_components(body, include),
        FeedKind::Heroku => decode_heroku(service, body),
    }
}

pub fn decode_indicator(
    service: &str,
    body: &[u8],
    components: &[String],
) -> Result<Vec<ComponentStatus>, VendorError> {
    let payload: IndicatorPayload = serde_json::from_slice(body)?;
    let indicator = payload.status.ok_or(VendorError::Missing("status"))?;
    let token = indicator.indicator.ok_or(VendorError::Missing("status.indicator"))?;
    let status = map_status_to_type(&token);

    let names: Vec<String> = if components.is_empty() {
        vec!["Overall".to_string()]
    } else {
        components.to_vec()
    };

    Ok(names
        .into_iter()
        .map(|name| ComponentStatus {
            id: slug_id(service, &name),
            name,
            status,
            description: indicator.description.clone(),
            updated_at: None,
        })
        .collect())
}

/// Leaf components only: group headers and grouped children are skipped.
/// When that leaves nothing, the group headers are used so a vendor that only
/// publishes groups is never reported as empty. A selection that still comes
/// out empty is an error, never an empty service.
pub fn decode_components(
    body: &[u8],
    include: &[String],
) -> Result<Vec<ComponentStatus>, VendorError> {
    let payload: ComponentsPayload = serde_json::from_slice(body)?;
    let raw = payload.components.ok_or(VendorError::Missing("components"))?;

    let selected: Vec<RawComponent> = if include.is_empty() {
        let (leaves, groups): (Vec<_>, Vec<_>) = raw
            .into_iter()
            .partition(|c| !c.is_group() && c.group_id.is_none());
        if leaves.is_empty() {
            groups.into_iter().filter(|c| c.is_group()).collect()
        } else {
            leaves
        }
    } else {
        raw.into_iter()
            .filter(|c| include.iter().any(|name| name == &c.name))
            .collect()
    };
    if selected.is_empty() {
        return Err(VendorError::Missing("included components"));
    }

    Ok(selected.into_iter().map(RawComponent::into_component).collect())
}

pub fn decode_heroku(service: &str, body: &[u8]) -> Result<Vec<ComponentStatus>, VendorError> {
    let payload: HerokuPayload = serde_json::from_slice(body)?;
    let systems = payload.status.ok_or(VendorError::Missing("status"))?;
    if systems.is_empty() {
        return Err(VendorError::Missing("systems"));
    }

    Ok(systems
        .into_iter()
        .map(|s| ComponentStatus {
            id: slug_id(service, &s.system),
            status: map_status_to_type(heroku_color_token(&s.status)),
            name: s.system,
            description: None,
            updated_at: None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDICATOR: &str = r#"{
        "page": {"id": "x", "name": "OpenAI", "url": "https://status.openai.com", "updated_at": "2024-05-01T10:00:00Z"},
        "status": {"indicator": "minor", "description": "Partially Degraded Service"}
    }"#;

    const COMPONENTS: &str = r#"{
        "page": {"id": "x", "name": "GitHub"},
        "components": [
            {"id": "g1", "name": "Git Operations", "status": "operational", "group_id": null, "group": false,
             "updated_at": "2024-05-01T10:00:00Z"},
            {"id": "g2", "name": "Actions", "status": "partial_outage", "group": false},
            {"id": "grp", "name": "Visit www.githubstatus.com", "status": "operational", "group": true},
            {"id": "child", "name": "Child", "status": "major_outage", "group_id": "grp"}
        ]
    }"#;

    #[test]
    fn test_indicator_fans_out_to_configured_components() {
        let names = vec!["ChatGPT Web".to_string(), "OpenAI API".to_string()];
        let components = decode_indicator("openai", INDICATOR.as_bytes(), &names).unwrap();

        assert_eq!(components.len(), 2);
        assert!(components.iter().all(|c| c.status == StatusType::DegradedPerformance));
        assert_eq!(components[0].id, "openai-chatgpt-web");
        assert_eq!(components[1].name, "OpenAI API");
    }

    #[test]
    fn test_indicator_without_names_uses_overall() {
        let components = decode_indicator("openai", INDICATOR.as_bytes(), &[]).unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].name, "Overall");
    }

    #[test]
    fn test_components_skip_groups() {
        let components = decode_components(COMPONENTS.as_bytes(), &[]).unwrap();
        let names: Vec<_> = components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Git Operations", "Actions"]);
        assert_eq!(components[1].status, StatusType::PartialOutage);
        assert!(components[0].updated_at.is_some());
    }

    #[test]
    fn test_components_include_list() {
        let include = vec!["Child".to_string()];
        let components = decode_components(COMPONENTS.as_bytes(), &include).unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].status, StatusType::MajorOutage);
    }

    #[test]
    fn test_components_fall_back_to_groups() {
        let body = r#"{"components": [
            {"id": "grp", "name": "Platform", "status": "degraded_performance", "group": true},
            {"id": "c", "name": "Inner", "status": "operational", "group_id": "grp"}
        ]}"#;
        let components = decode_components(body.as_bytes(), &[]).unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].name, "Platform");
    }

    #[test]
    fn test_unrecognized_component_token_is_unknown() {
        let body = r#"{"components": [{"id": "a", "name": "API", "status": "on_fire"}]}"#;
        let components = decode_components(body.as_bytes(), &[]).unwrap();
        assert_eq!(components[0].status, StatusType::Unknown);
    }

    #[test]
    fn test_heroku_colors() {
        let body = r#"{"status": [
            {"system": "Apps", "status": "green"},
            {"system": "Data", "status": "yellow"},
            {"system": "Tools", "status": "red"},
            {"system": "Other", "status": "blue"}
        ], "incidents": []}"#;
        let components = decode_heroku("heroku", body.as_bytes()).unwrap();
        let statuses: Vec<_> = components.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![
                StatusType::Operational,
                StatusType::DegradedPerformance,
                StatusType::MajorOutage,
                StatusType::Unknown,
            ]
        );
        assert_eq!(components[0].id, "heroku-apps");
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let body = r#"{"components": [{"id": "a", "name": "Public API", "status": "operational"}]}"#;
        let include = vec!["API".to_string()];
        assert!(matches!(
            decode_components(body.as_bytes(), &include),
            Err(VendorError::Missing("included components"))
        ));
        assert!(matches!(
            decode_components(br#"{"components": []}"#, &[]),
            Err(VendorError::Missing("included components"))
        ));
        assert!(matches!(
            decode_heroku("heroku", br#"{"status": []}"#),
            Err(VendorError::Missing("systems"))
        ));
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(matches!(
            decode_components(b"not json", &[]),
            Err(VendorError::Json(_))
        ));
        assert!(matches!(
            decode_components(b"{}", &[]),
            Err(VendorError::Missing("components"))
        ));
        assert!(matches!(
            decode_indicator("x", br#"{"status": {}}"#, &[]),
            Err(VendorError::Missing("status.indicator"))
        ));
    }
}
