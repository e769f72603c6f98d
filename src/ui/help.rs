//! Help overlay widget showing keyboard shortcuts.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::theme::Theme;
use super::widgets::centered_rect;

const DESCRIPTION: &str = "Track job applications from the terminal. Data lives in a local database and, once a GitHub token is configured, is merged with a JSON file in your repository.";

const SHORTCUTS: [(&str, &[(&str, &str)]); 4] = [
    (
        "Navigation",
        &[
            ("j / ↓", "Move down in list"),
            ("k / ↑", "Move up in list"),
            ("/", "Search company, role or job code"),
            ("Esc", "Clear search / close dialog"),
        ],
    ),
    (
        "Applications",
        &[
            ("a", "Add an application"),
            ("e / Enter", "Edit selected application"),
            ("d", "Delete selected application"),
            ("] / [", "Advance / revert status"),
        ],
    ),
    (
        "Data",
        &[
            ("x", "Export a JSON backup"),
            ("i", "Import a JSON backup (replaces all)"),
            ("S", "GitHub sync settings"),
            ("s", "Sync now"),
        ],
    ),
    (
        "General",
        &[("h / ?", "Toggle this help"), ("q", "Quit")],
    ),
];

/// Help overlay showing all keyboard shortcuts
pub struct HelpOverlay<'a> {
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        HelpOverlay { theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        // Center the help popup
        let popup_area = centered_rect(65, 80, area);

        // Clear the background
        frame.render_widget(Clear, popup_area);

        let mut lines: Vec<Line> = Vec::new();

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {DESCRIPTION}"),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::from(""));

        for (section, items) in SHORTCUTS {
            lines.push(Line::from(Span::styled(
                format!("  {section} "),
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::UNDERLINED),
            )));
            lines.push(Line::from(""));

            for (key, desc) in items {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(format!("{key:<14}"), Style::default().fg(self.theme.title)),
                    Span::raw(*desc),
                ]));
            }
            lines.push(Line::from(""));
        }

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(" jobtrack Help ")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style())
                    .title_style(self.theme.title_style())
                    .style(self.theme.surface_style()),
            )
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false })
            .style(self.theme.surface_style());

        frame.render_widget(paragraph, popup_area);
    }
}
