use chrono::Utc;

use statuswatch_core::history::{AvailabilityStats, StatusHistory};

use super::{CliError, Context};

pub fn run_history(ctx: &Context, service: Option<String>) -> Result<(), CliError> {
    let history = ctx.history()?;

    if history.is_empty() {
        println!(
            "No history recorded yet at {}. Run `statuswatch check` or the dashboard first.",
            ctx.history_path().display()
        );
        return Ok(());
    }

    let services = match service {
        Some(slug) => {
            if !history.services().contains(&slug) {
                return Err(CliError::UnknownServices(vec![slug]));
            }
            vec![slug]
        }
        None => history.services(),
    };

    print!("{}", format_report(&history, &services, ctx));
    Ok(())
}

fn format_report(history: &StatusHistory, services: &[String], ctx: &Context) -> String {
    let now = Utc::now();
    let mut out = format!(
        "{:<24} {:>10} {:>10} {:>10} {:>10}  last incident\n",
        "service", "24h", "7d", "30d", "incidents"
    );

    for slug in services {
        let stats = history.period_stats(slug, now);
        let name = ctx
            .config
            .services
            .get(slug)
            .and_then(|s| s.name.clone())
            .unwrap_or_else(|| slug.clone());
        out.push_str(&format!(
            "{:<24} {:>10} {:>10} {:>10} {:>10}  {}\n",
            name,
            percent(&stats.day),
            percent(&stats.week),
            percent(&stats.month),
            stats.month.incidents,
            stats
                .month
                .last_incident
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".into()),
        ));
    }
    out
}

fn percent(stats: &AvailabilityStats) -> String {
    format!("{:.2}%", stats.uptime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use statuswatch_core::config::StatuswatchConfig;
    use statuswatch_core::history::StatusHistoryEntry;
    use statuswatch_core::status::StatusType;

    #[test]
    fn test_report_lists_each_service() {
        let now = Utc::now();
        let mut history = StatusHistory::default();
        history.push(
            StatusHistoryEntry {
                timestamp: now - Duration::hours(2),
                service_name: "github".into(),
                status: StatusType::MajorOutage,
            },
            now,
        );
        history.push(
            StatusHistoryEntry {
                timestamp: now - Duration::hours(1),
                service_name: "github".into(),
                status: StatusType::Operational,
            },
            now,
        );

        let ctx = Context {
            config: StatuswatchConfig::builtin().unwrap(),
            config_path: None,
            settings_path: "settings.json".into(),
        };
        let report = format_report(&history, &["github".to_string()], &ctx);
        let line = report.lines().nth(1).unwrap();
        assert!(line.starts_with("GitHub"));
        assert!(line.contains(" 1 "));
    }
}
