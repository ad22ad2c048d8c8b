mod commands;
mod poller;
mod sources;
mod ui;

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{ArgGroup, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use statuswatch_core::settings::{default_settings_path, log_path_for};

use commands::{CliError, Context};

#[derive(Parser)]
#[command(name = "statuswatch")]
#[command(about = "Live health board for the SaaS status pages you depend on", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Service catalog to use instead of the discovered one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Settings file (filters, favorites, sort)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Live dashboard (default)
    Watch {
        /// Use simulated statuses instead of the network
        #[arg(long)]
        demo: bool,
    },
    /// Poll once, print the board and exit with the overall status
    Check {
        #[arg(long)]
        json: bool,
        /// Only check these services (repeatable)
        #[arg(short = 's', long = "service")]
        services: Vec<String>,
        #[arg(long)]
        demo: bool,
    },
    /// List configured services
    Services,
    /// Availability from recorded history
    History { service: Option<String> },
    /// Show or hide a component on the dashboard
    #[command(group(ArgGroup::new("mode").required(true).args(["include", "exclude"])))]
    Filter {
        service: String,
        component: String,
        #[arg(long)]
        include: bool,
        #[arg(long)]
        exclude: bool,
    },
    /// Toggle a component as favorite
    Favorite { service: String, component: String },
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn initialize_tracing(log_json: bool, tui: bool, log_file: Option<File>) {
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The dashboard owns the terminal, so its logs go to a file or nowhere.
    let writer = match (tui, log_file) {
        (true, Some(file)) => BoxMakeWriter::new(Mutex::new(file)),
        (true, None) => BoxMakeWriter::new(std::io::sink),
        (false, _) => BoxMakeWriter::new(std::io::stderr),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(writer);

    let registry = tracing_subscriber::registry().with(filter_layer);
    if log_json {
        registry.with(fmt_layer.json()).init();
    } else {
        registry.with(fmt_layer.with_ansi(!tui)).init();
    }
}

async fn run(cli: Cli, settings_path: PathBuf) -> Result<i32, CliError> {
    let ctx = Context::load(cli.config.as_deref(), settings_path)?;

    match cli.command {
        None => commands::run_watch(ctx, false).await?,
        Some(Commands::Watch { demo }) => commands::run_watch(ctx, demo).await?,
        Some(Commands::Check {
            json,
            services,
            demo,
        }) => return commands::run_check(ctx, json, services, demo).await,
        Some(Commands::Services) => commands::run_services(&ctx)?,
        Some(Commands::History { service }) => commands::run_history(&ctx, service)?,
        Some(Commands::Filter {
            service,
            component,
            include,
            exclude,
        }) => commands::run_filter(&ctx, &service, &component, include && !exclude)?,
        Some(Commands::Favorite { service, component }) => {
            commands::run_favorite(&ctx, &service, &component)?
        }
    }
    Ok(0)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let settings_path = cli.settings.clone().unwrap_or_else(default_settings_path);

    let tui = matches!(cli.command, None | Some(Commands::Watch { .. }));
    let log_file = if tui {
        let path = log_path_for(&settings_path);
        match open_log_file(&path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!(
                    "Warning: cannot open log file {}: {}. Dashboard logs are discarded.",
                    path.display(),
                    e
                );
                None
            }
        }
    } else {
        None
    };
    initialize_tracing(cli.log_json, tui, log_file);

    match run(cli, settings_path).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filter_requires_a_mode() {
        assert!(Cli::try_parse_from(["statuswatch", "filter", "github", "Pages"]).is_err());
        let cli = Cli::try_parse_from(["statuswatch", "filter", "github", "Pages", "--exclude"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Filter { include: false, exclude: true, .. })
        ));
    }

    #[test]
    fn test_log_file_creates_missing_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("statuswatch.log");
        assert!(open_log_file(&path).is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_log_file_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        assert!(open_log_file(&blocker.join("statuswatch.log")).is_err());
    }

    #[test]
    fn test_check_collects_services() {
        let cli = Cli::try_parse_from([
            "statuswatch", "check", "--json", "-s", "github", "--service", "slack",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Check { json, services, demo }) => {
                assert!(json);
                assert!(!demo);
                assert_eq!(services, vec!["github", "slack"]);
            }
            _ => panic!("expected check"),
        }
    }
}
