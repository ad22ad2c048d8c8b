use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use statuswatch_core::category::category_for;
use statuswatch_core::filter::StatusSelector;
use statuswatch_core::model::{ServiceId, ServiceStatus};
use statuswatch_core::settings::UserSettings;
use statuswatch_core::state::DashboardState;
use statuswatch_core::status::StatusClass;
use statuswatch_core::summary::{SummaryView, project, status_summary};

use super::theme::{Theme, theme};

/// What the event loop should do after a key press
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiAction {
    None,
    Quit,
    Refresh,
    /// Settings were edited and should be persisted
    SettingsChanged,
    NotificationsToggled(bool),
}

/// Cursor and view toggles that live only for one session
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub selected: usize,
    /// Component detail pane for the selected service
    pub detail: bool,
    pub selector: Option<StatusSelector>,
}

impl UiState {
    /// `visible` is the list as currently rendered, so the cursor always
    /// refers to what the user sees.
    pub fn handle_key(
        &mut self,
        code: KeyCode,
        visible: &[ServiceId],
        settings: &mut UserSettings,
        state: &DashboardState,
    ) -> UiAction {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return UiAction::Quit,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < visible.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Enter => self.detail = !self.detail,
            KeyCode::Char('d') => self.set_selector(Some(StatusSelector::Degraded)),
            KeyCode::Char('o') => self.set_selector(Some(StatusSelector::Outage)),
            KeyCode::Char('a') => self.set_selector(None),
            KeyCode::Char('r') => return UiAction::Refresh,
            KeyCode::Char('n') => {
                settings.notifications_enabled = !settings.notifications_enabled;
                return UiAction::NotificationsToggled(settings.notifications_enabled);
            }
            KeyCode::Char('s') => {
                settings.sort = settings.sort.cycle();
                return UiAction::SettingsChanged;
            }
            KeyCode::Char('f') => {
                let Some(service) = visible.get(self.selected).and_then(|id| state.service(id))
                else {
                    return UiAction::None;
                };
                toggle_service_favorite(settings, service);
                return UiAction::SettingsChanged;
            }
            _ => {}
        }
        UiAction::None
    }

    fn set_selector(&mut self, selector: Option<StatusSelector>) {
        if self.selector != selector {
            self.selector = selector;
            self.selected = 0;
        }
    }

    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// Favorite every component of a service, or clear them all if any already is.
pub fn toggle_service_favorite(settings: &mut UserSettings, service: &ServiceStatus) {
    let favorite = !settings.favorites.has_favorite(service);
    for component in &service.components {
        settings
            .favorites
            .set(&service.service_name, &component.name, favorite);
    }
}

/// The list exactly as rendered: filtered, narrowed, sorted, favorites pinned.
pub fn visible_view<'a>(
    state: &'a DashboardState,
    settings: &UserSettings,
    ui: &UiState,
) -> SummaryView<'a> {
    project(&state.services, &settings.filters, ui.selector).arrange(
        settings.sort,
        &settings.favorites,
        settings.pin_favorites,
    )
}

pub fn draw(f: &mut Frame, state: &DashboardState, settings: &UserSettings, ui: &UiState) {
    let theme = theme();
    let view = visible_view(state, settings, ui);

    let [header, body, banner, footer] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    draw_header(f, header, state, &view, settings, theme);

    if ui.detail {
        let [list, detail] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(body);
        draw_services(f, list, state, &view, settings, ui, theme);
        let selected = view.services.get(ui.selected).copied();
        draw_detail(f, detail, selected, settings, theme);
    } else {
        draw_services(f, body, state, &view, settings, ui, theme);
    }

    draw_notification(f, banner, state, theme);
    draw_footer(f, footer, theme);
}

fn draw_header(
    f: &mut Frame,
    area: Rect,
    state: &DashboardState,
    view: &SummaryView,
    settings: &UserSettings,
    theme: &Theme,
) {
    let summary = status_summary(&state.services);
    let stats = view.stats;

    let headline = if state.services.is_empty() {
        Line::from(Span::styled(
            format!("Checking status of {} services...", state.catalog.len()),
            theme.text_dim_style(),
        ))
    } else {
        let mut spans = vec![
            Span::styled(
                format!("{} {} ", theme.status_icon(summary.overall_status), summary.status_text),
                theme.status_style(summary.overall_status),
            ),
            Span::styled(summary.status_description.clone(), theme.text_dim_style()),
        ];
        if state.is_initial_load() {
            spans.push(Span::styled(
                format!("   loading {}/{}", state.services.len(), state.catalog.len()),
                theme.key_hint_style(),
            ));
        } else if let Some(at) = state.last_update {
            spans.push(Span::styled(
                format!("   updated {}", at.format("%H:%M:%S")),
                theme.text_dim_style(),
            ));
        }
        Line::from(spans)
    };

    let counts = Line::from(vec![
        Span::styled("Health ", theme.text_dim_style()),
        Span::styled(format!("{}%", stats.health_score()), theme.score_style(stats.health_score())),
        Span::raw("   "),
        Span::styled(format!("● {} ok", stats.operational), theme.class_style(StatusClass::Operational)),
        Span::raw("  "),
        Span::styled(format!("◐ {} degraded", stats.degraded), theme.class_style(StatusClass::Degraded)),
        Span::raw("  "),
        Span::styled(format!("✗ {} outage", stats.outage), theme.class_style(StatusClass::Outage)),
        Span::raw("  "),
        Span::styled(format!("? {} unknown", stats.unknown), theme.class_style(StatusClass::Unknown)),
        Span::styled(
            format!(
                "   sort: {}  show: {}",
                settings.sort.label(),
                view.selector.map(|s| s.label()).unwrap_or("ALL")
            ),
            theme.text_dim_style(),
        ),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(false))
        .title(Span::styled(" statuswatch ", theme.title_style()));
    f.render_widget(Paragraph::new(vec![headline, counts]).block(block), area);
}

fn draw_services(
    f: &mut Frame,
    area: Rect,
    state: &DashboardState,
    view: &SummaryView,
    settings: &UserSettings,
    ui: &UiState,
    theme: &Theme,
) {
    let items: Vec<ListItem> = view
        .services
        .iter()
        .map(|service| {
            let status = service.overall_status();
            let star = if settings.favorites.has_favorite(service) { "★" } else { " " };
            let loading = if state.is_loading(&service.service_name) { "⟳" } else { " " };
            let category = category_for(&service.service_name)
                .map(|c| c.name)
                .unwrap_or("Other");

            let mut spans = vec![
                Span::styled(format!("{} ", theme.status_icon(status)), theme.status_style(status)),
                Span::styled(format!("{star}{loading} "), theme.key_hint_style()),
                Span::styled(format!("{:<22}", service.display_name), theme.text_style()),
                Span::styled(format!("{:<22}", status.label()), theme.status_style(status)),
                Span::styled(format!("{category:<9}"), theme.text_dim_style()),
            ];
            if let Some(error) = &service.error {
                spans.push(Span::styled(format!(" {error}"), theme.text_dim_style()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(" Services {}/{} ", view.services.len(), state.catalog.len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(!ui.detail))
                .title(title),
        )
        .highlight_style(theme.selection_style());

    let mut list_state = ListState::default();
    if !view.services.is_empty() {
        list_state.select(Some(ui.selected));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_detail(
    f: &mut Frame,
    area: Rect,
    service: Option<&ServiceStatus>,
    settings: &UserSettings,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(true));

    let Some(service) = service else {
        f.render_widget(Paragraph::new("No service selected").block(block), area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(service.page_url.clone(), theme.text_dim_style())),
        Line::from(Span::styled(
            format!("updated {}", service.updated_at.format("%H:%M:%S")),
            theme.text_dim_style(),
        )),
        Line::raw(""),
    ];

    for component in &service.components {
        let included = settings
            .filters
            .is_included(&service.service_name, &component.name);
        let favorite = settings
            .favorites
            .is_favorite(&service.service_name, &component.name);
        let name_style = if included { theme.text_style() } else { theme.text_dim_style() };

        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", theme.status_icon(component.status)),
                theme.status_style(component.status),
            ),
            Span::styled(if favorite { "★ " } else { "  " }, theme.key_hint_style()),
            Span::styled(component.name.clone(), name_style),
            Span::styled(format!("  {}", component.status.label()), theme.status_style(component.status)),
            Span::styled(if included { "" } else { "  (hidden)" }, theme.text_dim_style()),
        ]));
        if let Some(description) = &component.description {
            lines.push(Line::from(Span::styled(
                format!("    {description}"),
                theme.text_dim_style(),
            )));
        }
    }

    let title = format!(" {} ", service.display_name);
    f.render_widget(Paragraph::new(lines).block(block.title(title)), area);
}

fn draw_notification(f: &mut Frame, area: Rect, state: &DashboardState, theme: &Theme) {
    let Some(notification) = state.latest_notification() else {
        return;
    };
    let change = &notification.change;
    let line = Line::from(vec![
        Span::styled(
            format!(" {} {} ", notification.at.format("%H:%M"), change.title()),
            theme.status_style(change.current),
        ),
        Span::styled(change.message(), theme.text_style()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_footer(f: &mut Frame, area: Rect, theme: &Theme) {
    let hints = [
        ("j/k", "move"),
        ("enter", "detail"),
        ("d", "degraded"),
        ("o", "outage"),
        ("a", "all"),
        ("s", "sort"),
        ("f", "favorite"),
        ("r", "refresh"),
        ("n", "notify"),
        ("q", "quit"),
    ];
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(format!(" {key} "), theme.key_hint_style()),
                Span::styled(format!("{label} "), theme.text_dim_style()),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
