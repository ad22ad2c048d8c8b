use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event as CEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use statuswatch_core::model::ServiceId;
use statuswatch_core::reducer::{DashboardEvent, EventEnvelope, reduce};
use statuswatch_core::settings::UserSettings;
use statuswatch_core::state::{DashboardState, SharedState};

use super::{CliError, Context};
use crate::poller::Poller;
use crate::sources::build_source;
use crate::ui::dashboard::{UiAction, UiState, draw, visible_view};

/// How often history is flushed to disk while the dashboard runs
const HISTORY_FLUSH: Duration = Duration::from_secs(60);

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Ways the key handler talks back to the background tasks
struct Channels<'a> {
    poller: &'a Poller,
    event_tx: &'a broadcast::Sender<EventEnvelope>,
    refresh_tx: &'a broadcast::Sender<()>,
}

fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(mut terminal: Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

pub async fn run_watch(ctx: Context, demo: bool) -> Result<(), CliError> {
    let mut settings = ctx.settings()?;
    let history = if demo { Default::default() } else { ctx.history()? };

    let entries = ctx.config.entries();
    let catalog: Vec<ServiceId> = entries.iter().map(|e| e.slug.clone()).collect();

    let mut initial = DashboardState::new(catalog, history);
    initial.notifications_enabled = settings.notifications_enabled;
    let state = initial.shared();

    let (event_tx, _) = broadcast::channel::<EventEnvelope>(1_000);
    let (refresh_tx, _) = broadcast::channel::<()>(16);

    // Reducer task
    let state_for_reducer = state.clone();
    let mut reducer_rx = event_tx.subscribe();
    tokio::spawn(async move {
        loop {
            match reducer_rx.recv().await {
                Ok(env) => {
                    let mut s = state_for_reducer.write().await;
                    reduce(&mut s, &env);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "dashboard reducer lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let source = build_source(&ctx.config, demo)?;
    info!(
        source = source.name(),
        services = entries.len(),
        interval_secs = ctx.config.refresh_interval_secs,
        "starting dashboard"
    );
    let poller = Poller::new(source, entries, ctx.config.refresh_interval());
    let workers = poller.spawn(event_tx.clone(), &refresh_tx);

    let mut terminal = setup_terminal()?;
    let channels = Channels {
        poller: &poller,
        event_tx: &event_tx,
        refresh_tx: &refresh_tx,
    };
    let res = tui_loop(&mut terminal, &state, &mut settings, &ctx, channels, demo).await;
    restore_terminal(terminal)?;

    for worker in workers {
        worker.abort();
    }
    if !demo {
        save_history(&state, &ctx).await;
    }
    res
}

async fn tui_loop(
    terminal: &mut Tui,
    state: &SharedState,
    settings: &mut UserSettings,
    ctx: &Context,
    channels: Channels<'_>,
    demo: bool,
) -> Result<(), CliError> {
    let mut ui = UiState::default();
    let mut last_flush = tokio::time::Instant::now();

    loop {
        let visible: Vec<ServiceId> = {
            let snapshot = state.read().await;
            let visible: Vec<ServiceId> = visible_view(&snapshot, settings, &ui)
                .services
                .iter()
                .map(|s| s.service_name.clone())
                .collect();
            ui.clamp(visible.len());
            terminal.draw(|f| draw(f, &snapshot, settings, &ui))?;
            visible
        };

        if !demo && last_flush.elapsed() >= HISTORY_FLUSH {
            save_history(state, ctx).await;
            last_flush = tokio::time::Instant::now();
        }

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let CEvent::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let action = {
            let snapshot = state.read().await;
            ui.handle_key(key.code, &visible, settings, &snapshot)
        };

        match action {
            UiAction::Quit => return Ok(()),
            UiAction::Refresh => {
                debug!("manual refresh requested");
                let _ = channels.refresh_tx.send(());
            }
            UiAction::NotificationsToggled(enabled) => {
                let _ = channels
                    .event_tx
                    .send(channels.poller.envelope(DashboardEvent::NotificationsToggled { enabled }));
                persist(settings, ctx);
            }
            UiAction::SettingsChanged => persist(settings, ctx),
            UiAction::None => {}
        }
    }
}

fn persist(settings: &UserSettings, ctx: &Context) {
    if let Err(e) = settings.save(&ctx.settings_path) {
        warn!(error = %e, "could not save settings");
    }
}

async fn save_history(state: &SharedState, ctx: &Context) {
    let snapshot = state.read().await;
    match snapshot.history.save(&ctx.history_path()) {
        Ok(()) => debug!(entries = snapshot.history.len(), "history saved"),
        Err(e) => warn!(error = %e, "could not save status history"),
    }
}
