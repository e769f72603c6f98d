//! Theme configuration for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::data::JobStatus;
use crate::sync::StatusKind;

/// Color theme for the application
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub border: Color,
    pub title: Color,
    pub muted: Color,
    pub info: Color,
    pub success: Color,
    pub error: Color,
    /// Badge colors indexed like `JobStatus::ALL`
    pub stage_colors: [Color; 6],
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            bg: Color::Reset,
            fg: Color::White,
            highlight_bg: Color::Rgb(60, 60, 80),
            highlight_fg: Color::White,
            border: Color::Rgb(100, 100, 120),
            title: Color::Cyan,
            muted: Color::DarkGray,
            info: Color::Yellow,
            success: Color::Green,
            error: Color::Red,
            // Named colors for terminal compatibility
            stage_colors: [
                Color::Magenta,
                Color::Blue,
                Color::Yellow,
                Color::Green,
                Color::Red,
                Color::Gray,
            ],
        }
    }
}

impl Theme {
    /// Base surface style used to paint widget backgrounds
    pub fn surface_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Get style for highlighted/selected items
    pub fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for borders
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Get style for focused panel borders (distinct from normal borders)
    pub fn focused_border_style(&self) -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for titles
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Badge style for an application stage
    pub fn status_style(&self, status: JobStatus) -> Style {
        let color = JobStatus::ALL
            .iter()
            .position(|s| *s == status)
            .map(|idx| self.stage_colors[idx])
            .unwrap_or(self.muted);
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Style for a sync status message
    pub fn sync_style(&self, kind: StatusKind) -> Style {
        let color = match kind {
            StatusKind::Info => self.info,
            StatusKind::Success => self.success,
            StatusKind::Error => self.error,
        };
        Style::default().fg(color)
    }
}
