//! Color palette and style helpers for the dashboard.
//!
//! Widgets never pick colors directly; they ask the theme for the style of a
//! status, a health score or a piece of chrome.

use ratatui::style::{Color, Modifier, Style};

use statuswatch_core::status::{StatusClass, StatusType};

#[derive(Clone, Debug)]
pub struct Palette {
    pub border: Color,
    pub text: Color,
    pub text_dim: Color,
    pub accent: Color,
    /// Operational
    pub ok: Color,
    /// Degraded performance
    pub degraded: Color,
    pub maintenance: Color,
    pub outage: Color,
    /// Unknown and placeholder snapshots
    pub unknown: Color,
    pub selection_bg: Color,
    pub key_hint: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            border: Color::Rgb(60, 60, 60),
            text: Color::Rgb(212, 212, 212),
            text_dim: Color::Rgb(130, 130, 130),
            accent: Color::Rgb(79, 193, 255),
            ok: Color::Rgb(78, 201, 176),
            degraded: Color::Rgb(220, 180, 100),
            maintenance: Color::Rgb(156, 160, 254),
            outage: Color::Rgb(244, 105, 93),
            unknown: Color::Rgb(110, 110, 110),
            selection_bg: Color::Rgb(38, 79, 120),
            key_hint: Color::Rgb(206, 145, 120),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Theme {
    pub palette: Palette,
}

impl Theme {
    pub fn status_color(&self, status: StatusType) -> Color {
        match status {
            StatusType::Operational => self.palette.ok,
            StatusType::DegradedPerformance => self.palette.degraded,
            StatusType::UnderMaintenance => self.palette.maintenance,
            StatusType::PartialOutage | StatusType::MajorOutage => self.palette.outage,
            StatusType::Unknown => self.palette.unknown,
        }
    }

    pub fn status_style(&self, status: StatusType) -> Style {
        let style = Style::default().fg(self.status_color(status));
        if status == StatusType::MajorOutage {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    pub fn status_icon(&self, status: StatusType) -> &'static str {
        match status {
            StatusType::Operational => "●",
            StatusType::DegradedPerformance => "◐",
            StatusType::UnderMaintenance => "◆",
            StatusType::PartialOutage => "▲",
            StatusType::MajorOutage => "✗",
            StatusType::Unknown => "?",
        }
    }

    pub fn class_style(&self, class: StatusClass) -> Style {
        let color = match class {
            StatusClass::Operational => self.palette.ok,
            StatusClass::Degraded => self.palette.degraded,
            StatusClass::Outage => self.palette.outage,
            StatusClass::Unknown => self.palette.unknown,
        };
        Style::default().fg(color)
    }

    /// 90+ green, 70+ amber, below that red
    pub fn score_style(&self, score: u32) -> Style {
        let color = match score {
            90.. => self.palette.ok,
            70..=89 => self.palette.degraded,
            _ => self.palette.outage,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.palette.accent)
        } else {
            Style::default().fg(self.palette.border)
        }
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.palette.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.palette.text)
    }

    pub fn text_dim_style(&self) -> Style {
        Style::default().fg(self.palette.text_dim)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_hint_style(&self) -> Style {
        Style::default().fg(self.palette.key_hint)
    }
}

static DEFAULT_THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

pub fn theme() -> &'static Theme {
    DEFAULT_THEME.get_or_init(Theme::default)
}
