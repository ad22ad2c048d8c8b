use serde::Serialize;

use crate::model::ServiceStatus;
use crate::summary::SummaryStats;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ServiceCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub services: &'static [&'static str],
}

pub const OTHER: &str = "other";

pub const SERVICE_CATEGORIES: &[ServiceCategory] = &[
    ServiceCategory {
        id: "ai-ml",
        name: "AI/ML",
        services: &["openai", "anthropic", "cursor", "perplexity", "xai"],
    },
    ServiceCategory {
        id: "cloud",
        name: "Cloud",
        services: &[
            "firebase", "supabase", "netlify", "vercel", "heroku", "cloudflare", "dockerhub",
        ],
    },
    ServiceCategory {
        id: "devtools",
        name: "DevTools",
        services: &["github", "gitlab", "circleci", "atlassian", "replit", "v0", "huggingface"],
    },
    ServiceCategory {
        id: "business",
        name: "Business",
        services: &["stripe", "auth0", "slack", "sendgrid", "datadog", "mongodb", "zetaglobal"],
    },
];

pub fn category_for(service: &str) -> Option<&'static ServiceCategory> {
    SERVICE_CATEGORIES
        .iter()
        .find(|category| category.services.contains(&service))
}

pub fn category_id(service: &str) -> &'static str {
    category_for(service).map(|c| c.id).unwrap_or(OTHER)
}

pub fn category_name(id: &str) -> &'static str {
    SERVICE_CATEGORIES
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name)
        .unwrap_or("Other")
}

/// Group services by category in table order, `other` last. Input order is
/// kept within a group and empty groups are omitted.
pub fn group_by_category<'a>(
    services: &[&'a ServiceStatus],
) -> Vec<(&'static str, Vec<&'a ServiceStatus>)> {
    let mut groups: Vec<(&'static str, Vec<&'a ServiceStatus>)> = SERVICE_CATEGORIES
        .iter()
        .map(|c| (c.id, Vec::new()))
        .chain(std::iter::once((OTHER, Vec::new())))
        .collect();

    for service in services {
        let id = category_id(&service.service_name);
        if let Some((_, members)) = groups.iter_mut().find(|(gid, _)| *gid == id) {
            members.push(*service);
        }
    }

    groups.retain(|(_, members)| !members.is_empty());
    groups
}

pub fn category_stats(members: &[&ServiceStatus]) -> SummaryStats {
    SummaryStats::from_services(members.iter().copied())
}
