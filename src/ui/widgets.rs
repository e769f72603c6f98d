//! UI widgets for the job board.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::theme::Theme;
use crate::data::JobRecord;
use crate::sync::SyncStatus;

/// Scrollable list of applications
pub struct JobBoard<'a> {
    jobs: &'a [JobRecord],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> JobBoard<'a> {
    pub fn new(jobs: &'a [JobRecord], selected: usize, theme: &'a Theme) -> Self {
        JobBoard {
            jobs,
            selected,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let items: Vec<ListItem> = self
            .jobs
            .iter()
            .map(|job| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<13}", job.status.label()), self.theme.status_style(job.status)),
                    Span::styled(format!("{:<11}", job.date), self.theme.muted_style()),
                    Span::raw(format!("{} / {}", job.company, job.role)),
                ]))
            })
            .collect();

        let block = Block::default()
            .title(format!(" Applications ({}) ", self.jobs.len()))
            .borders(Borders::ALL)
            .border_type(if focused {
                BorderType::Double
            } else {
                BorderType::Plain
            })
            .border_style(if focused {
                self.theme.focused_border_style()
            } else {
                self.theme.border_style()
            })
            .title_style(self.theme.title_style());

        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.highlight_style())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if !self.jobs.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// One-line search input
pub struct SearchBar<'a> {
    query: &'a str,
    editing: bool,
    theme: &'a Theme,
}

impl<'a> SearchBar<'a> {
    pub fn new(query: &'a str, editing: bool, theme: &'a Theme) -> Self {
        SearchBar {
            query,
            editing,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let line = if self.query.is_empty() && !self.editing {
            Line::from(Span::styled(
                "Press / to search by company, role or job code",
                self.theme.muted_style(),
            ))
        } else {
            Line::from(vec![
                Span::raw(self.query),
                Span::raw(if self.editing { "_" } else { "" }),
            ])
        };

        let block = Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(if self.editing {
                self.theme.focused_border_style()
            } else {
                self.theme.border_style()
            });

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

/// Details of the selected application
pub struct DetailPanel<'a> {
    job: Option<&'a JobRecord>,
    theme: &'a Theme,
}

impl<'a> DetailPanel<'a> {
    pub fn new(job: Option<&'a JobRecord>, theme: &'a Theme) -> Self {
        DetailPanel { job, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Details ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());

        let Some(job) = self.job else {
            let empty = Paragraph::new(Span::styled(
                "No applications yet. Press a to add one.",
                self.theme.muted_style(),
            ))
            .block(block)
            .wrap(Wrap { trim: true });
            frame.render_widget(empty, area);
            return;
        };

        let label = |text: &'static str| Span::styled(format!("{text:<10}"), self.theme.title_style());
        let mut lines = vec![
            Line::from(Span::styled(
                job.company.clone(),
                self.theme.title_style().add_modifier(Modifier::UNDERLINED),
            )),
            Line::from(job.role.clone()),
            Line::from(""),
            Line::from(vec![
                label("Status"),
                Span::styled(job.status.label(), self.theme.status_style(job.status)),
            ]),
            Line::from(vec![label("Applied"), Span::raw(job.date.clone())]),
        ];
        if let Some(code) = job.job_code.as_deref().filter(|c| !c.is_empty()) {
            lines.push(Line::from(vec![label("Job code"), Span::raw(code.to_string())]));
        }
        if !job.url.is_empty() {
            lines.push(Line::from(vec![label("URL"), Span::raw(job.url.clone())]));
        }
        if let Some(created) = job.created_at {
            lines.push(Line::from(vec![
                label("Tracked"),
                Span::styled(
                    created.format("%Y-%m-%d %H:%M UTC").to_string(),
                    self.theme.muted_style(),
                ),
            ]));
        }

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    count: usize,
    sync: Option<&'a SyncStatus>,
    message: Option<&'a str>,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(
        count: usize,
        sync: Option<&'a SyncStatus>,
        message: Option<&'a str>,
        error: Option<&'a str>,
        theme: &'a Theme,
    ) -> Self {
        StatusBar {
            count,
            sync,
            message,
            error,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(format!(
            "Tracking {} active opportunities",
            self.count
        ))];
        if let Some(status) = self.sync {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(status.message, self.theme.sync_style(status.kind)));
        }
        if let Some(e) = self.error {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(format!("Error: {e}"), self.theme.sync_style(crate::sync::StatusKind::Error)));
        } else if let Some(m) = self.message {
            spans.push(Span::raw(" | "));
            spans.push(Span::raw(m.to_string()));
        }
        spans.push(Span::styled(" | [?] Help [q] Quit", self.theme.muted_style()));

        let paragraph = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::TOP));
        frame.render_widget(paragraph, area);
    }
}

/// Yes/no prompt before deleting an application
pub struct ConfirmDialog<'a> {
    prompt: String,
    theme: &'a Theme,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(prompt: String, theme: &'a Theme) -> Self {
        ConfirmDialog { prompt, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup_area);

        let lines = vec![
            Line::from(""),
            Line::from(self.prompt.clone()),
            Line::from(""),
            Line::from(Span::styled("[y] Yes   [n] No", self.theme.muted_style())),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(" Confirm ")
                    .borders(Borders::ALL)
                    .border_style(self.theme.focused_border_style())
                    .style(self.theme.surface_style()),
            );
        frame.render_widget(paragraph, popup_area);
    }
}

/// Create a centered rect for popup dialogs
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
