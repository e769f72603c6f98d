//! Modal input forms: add/edit a job, sync settings, and the import prompt.

use std::path::PathBuf;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::theme::Theme;
use super::widgets::centered_rect;
use crate::data::{JobPatch, JobRecord, JobStatus, Settings};

/// What the form is collecting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    AddJob,
    EditJob { id: String },
    Settings,
    Import,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Rendered masked
    Secret,
    /// Cycled with Left/Right instead of typed
    Status,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
}

impl Field {
    fn text(label: &'static str, value: impl Into<String>) -> Self {
        Field {
            label,
            value: value.into(),
            kind: FieldKind::Text,
        }
    }
}

/// Result of feeding a key to a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Continue,
    Submit,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<Field>,
    pub focused: usize,
    pub status: JobStatus,
    pub error: Option<String>,
}

impl Form {
    fn new(kind: FormKind, fields: Vec<Field>) -> Self {
        Form {
            kind,
            fields,
            focused: 0,
            status: JobStatus::default(),
            error: None,
        }
    }

    /// Empty job form with the date prefilled
    pub fn add_job(today: NaiveDate) -> Self {
        let mut form = Form::new(FormKind::AddJob, job_fields(&JobRecord::default()));
        form.fields[2].value = today.format("%Y-%m-%d").to_string();
        form
    }

    pub fn edit_job(record: &JobRecord) -> Self {
        let mut form = Form::new(
            FormKind::EditJob {
                id: record.id.clone(),
            },
            job_fields(record),
        );
        form.status = record.status;
        form
    }

    pub fn settings(settings: &Settings) -> Self {
        let fields = vec![
            Field {
                label: "Token",
                value: settings.token.clone(),
                kind: FieldKind::Secret,
            },
            Field::text("Owner", settings.owner.clone()),
            Field::text("Repo", settings.repo.clone()),
            Field::text("Path", settings.path.clone()),
        ];
        Form::new(FormKind::Settings, fields)
    }

    pub fn import(default_dir: &std::path::Path) -> Self {
        let mut dir = default_dir.display().to_string();
        if !dir.ends_with(std::path::MAIN_SEPARATOR) {
            dir.push(std::path::MAIN_SEPARATOR);
        }
        Form::new(FormKind::Import, vec![Field::text("File", dir)])
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::AddJob => " Add Application ",
            FormKind::EditJob { .. } => " Edit Application ",
            FormKind::Settings => " GitHub Sync ",
            FormKind::Import => " Import Backup ",
        }
    }

    /// Feed one key press to the form
    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        let kind = self.fields[self.focused].kind;
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.focused = (self.focused + 1) % self.fields.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused = self
                    .focused
                    .checked_sub(1)
                    .unwrap_or(self.fields.len() - 1);
            }
            KeyCode::Right if kind == FieldKind::Status => self.status = self.status.next(),
            KeyCode::Left if kind == FieldKind::Status => self.status = self.status.prev(),
            KeyCode::Backspace if kind != FieldKind::Status => {
                self.fields[self.focused].value.pop();
            }
            KeyCode::Char(c) if kind != FieldKind::Status => {
                self.fields[self.focused].value.push(c);
            }
            _ => {}
        }
        FormAction::Continue
    }

    fn value(&self, label: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.trim())
            .unwrap_or_default()
    }

    fn validated_job(&self) -> Result<JobRecord, String> {
        let company = self.value("Company");
        let role = self.value("Role");
        if company.is_empty() || role.is_empty() {
            return Err("Company and role are required".to_string());
        }
        let date = NaiveDate::parse_from_str(self.value("Date"), "%Y-%m-%d")
            .map_err(|_| "Date must be YYYY-MM-DD".to_string())?;
        let job_code = Some(self.value("Job code"))
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(JobRecord {
            company: company.to_string(),
            role: role.to_string(),
            date: date.format("%Y-%m-%d").to_string(),
            job_code,
            url: self.value("URL").to_string(),
            status: self.status,
            ..Default::default()
        })
    }

    /// New record from an add form. The store assigns id and creation time.
    pub fn to_new_record(&self) -> Result<JobRecord, String> {
        self.validated_job()
    }

    /// Patch for an edit form
    pub fn to_patch(&self) -> Result<JobPatch, String> {
        let FormKind::EditJob { id } = &self.kind else {
            return Err("Not editing an application".to_string());
        };
        let job = self.validated_job()?;
        Ok(JobPatch {
            company: Some(job.company),
            role: Some(job.role),
            date: Some(job.date),
            job_code: Some(job.job_code),
            url: Some(job.url),
            status: Some(job.status),
            ..JobPatch::new(id.clone())
        })
    }

    pub fn to_settings(&self) -> Settings {
        Settings {
            token: self.value("Token").to_string(),
            owner: self.value("Owner").to_string(),
            repo: self.value("Repo").to_string(),
            path: self.value("Path").to_string(),
        }
    }

    pub fn import_path(&self) -> Result<PathBuf, String> {
        let raw = self.value("File");
        if raw.is_empty() {
            return Err("Enter a backup file path".to_string());
        }
        Ok(PathBuf::from(raw))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup_area);

        let mut lines: Vec<Line> = vec![Line::from("")];
        for (idx, field) in self.fields.iter().enumerate() {
            let focused = idx == self.focused;
            let value = match field.kind {
                FieldKind::Text => field.value.clone(),
                FieldKind::Secret => "•".repeat(field.value.chars().count()),
                FieldKind::Status => format!("◀ {} ▶", self.status),
            };
            let cursor = if focused && field.kind != FieldKind::Status {
                "_"
            } else {
                ""
            };
            let value_style = match field.kind {
                FieldKind::Status => theme.status_style(self.status),
                _ if focused => theme.highlight_style(),
                _ => theme.surface_style(),
            };
            lines.push(Line::from(vec![
                Span::raw(if focused { " > " } else { "   " }),
                Span::styled(format!("{:<10}", field.label), theme.title_style()),
                Span::styled(format!("{value}{cursor}"), value_style),
            ]));
        }

        lines.push(Line::from(""));
        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                format!("   {error}"),
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "   [Tab] Next field  [Enter] Save  [Esc] Cancel",
            theme.muted_style(),
        )));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(self.title())
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_style(theme.focused_border_style())
                    .title_style(theme.title_style())
                    .style(theme.surface_style()),
            )
            .style(theme.surface_style());

        frame.render_widget(paragraph, popup_area);
    }
}

fn job_fields(record: &JobRecord) -> Vec<Field> {
    vec![
        Field::text("Company", record.company.clone()),
        Field::text("Role", record.role.clone()),
        Field::text("Date", record.date.clone()),
        Field::text("Job code", record.job_code.clone().unwrap_or_default()),
        Field::text("URL", record.url.clone()),
        Field {
            label: "Status",
            value: String::new(),
            kind: FieldKind::Status,
        },
    ]
}
