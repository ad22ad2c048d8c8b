use chrono::Utc;
use serde_json::json;
use tracing::warn;

use statuswatch_core::aggregate::aggregate;
use statuswatch_core::category::{category_name, category_stats, group_by_category};
use statuswatch_core::model::ServiceStatus;
use statuswatch_core::status::StatusType;
use statuswatch_core::summary::{SummaryView, project, status_summary};

use super::{CliError, Context};
use crate::poller::Poller;
use crate::sources::build_source;

/// 0 when everything is operational, 2 when anything is in an outage, 1 for
/// every other state.
pub fn exit_code(status: StatusType) -> i32 {
    match status {
        StatusType::Operational => 0,
        StatusType::PartialOutage | StatusType::MajorOutage => 2,
        _ => 1,
    }
}

/// Poll once, print the board and return the process exit code.
pub async fn run_check(
    mut ctx: Context,
    json_output: bool,
    only: Vec<String>,
    demo: bool,
) -> Result<i32, CliError> {
    if !only.is_empty() {
        ctx.config.retain(&only).map_err(CliError::UnknownServices)?;
    }

    let settings = ctx.settings()?;
    let source = build_source(&ctx.config, demo)?;
    let poller = Poller::new(source, ctx.config.entries(), ctx.config.refresh_interval());
    let services = poller.poll_all().await;

    if !demo {
        let mut history = ctx.history()?;
        history.record(&services, Utc::now());
        if let Err(e) = history.save(&ctx.history_path()) {
            warn!(error = %e, "could not save status history");
        }
    }

    let view = project(&services, &settings.filters, None).arrange(
        settings.sort,
        &settings.favorites,
        settings.pin_favorites,
    );
    let overall = aggregate(view.services.iter().map(|s| s.overall_status()));

    if json_output {
        println!("{}", render_json(&services, &view));
    } else {
        print_table(&services, &view);
    }

    Ok(exit_code(overall))
}

fn render_json(services: &[ServiceStatus], view: &SummaryView) -> String {
    let rows: Vec<_> = view
        .services
        .iter()
        .map(|s| {
            json!({
                "service_name": s.service_name,
                "display_name": s.display_name,
                "status": s.overall_status(),
                "page_url": s.page_url,
                "components": s.components,
                "error": s.error,
            })
        })
        .collect();

    let body = json!({
        "summary": status_summary(services),
        "stats": view.stats,
        "health_score": view.health_score(),
        "services": rows,
    });
    serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
}

fn print_table(services: &[ServiceStatus], view: &SummaryView) {
    let summary = status_summary(services);
    println!("{}", summary.status_text);
    println!("{}\n", summary.status_description);

    for (category, members) in group_by_category(&view.services) {
        let stats = category_stats(&members);
        println!(
            "{} ({}/{} operational)",
            category_name(category),
            stats.operational,
            stats.total
        );
        for service in members {
            let status = service.overall_status();
            print!("  {:<24} {:<22}", service.display_name, status.label());
            match &service.error {
                Some(error) => println!(" ({})", error),
                None => println!(),
            }
            for component in &service.components {
                if component.status != StatusType::Operational {
                    println!("      - {}: {}", component.name, component.status.label());
                }
            }
        }
    }

    let stats = view.stats;
    println!(
        "\nHealth {}%  operational {} ({}%)  degraded {}  outage {}  unknown {}  ({} services)",
        stats.health_score(),
        stats.operational,
        stats.operational_percentage(),
        stats.degraded,
        stats.outage,
        stats.unknown,
        stats.total
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use statuswatch_core::filter::ComponentFilter;
    use statuswatch_core::model::ComponentStatus;

    fn service(slug: &str, status: StatusType) -> ServiceStatus {
        ServiceStatus {
            service_name: slug.into(),
            display_name: slug.into(),
            components: vec![ComponentStatus::new("c", "API", status)],
            page_url: String::new(),
            icon: slug.into(),
            description: None,
            updated_at: Utc::now(),
            error: None,
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(StatusType::Operational), 0);
        assert_eq!(exit_code(StatusType::MajorOutage), 2);
        assert_eq!(exit_code(StatusType::PartialOutage), 2);
        assert_eq!(exit_code(StatusType::DegradedPerformance), 1);
        assert_eq!(exit_code(StatusType::Unknown), 1);
    }

    #[test]
    fn test_json_output_shape() {
        let services = vec![
            service("github", StatusType::Operational),
            service("slack", StatusType::PartialOutage),
        ];
        let view = project(&services, &ComponentFilter::new(), None);
        let value: serde_json::Value = serde_json::from_str(&render_json(&services, &view)).unwrap();

        assert_eq!(value["health_score"], 50);
        assert_eq!(value["stats"]["outage"], 1);
        assert_eq!(value["services"][1]["status"], "partial_outage");
        assert_eq!(value["summary"]["overall_status"], "partial_outage");
    }
}
