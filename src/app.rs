//! Main application logic and TUI event loop.

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::cli::AppConfig;
use crate::commands::open_store;
use crate::data::{JobPatch, JobRecord, JobStore, Subscription};
use crate::sync::SyncStatus;
use crate::ui::{
    form::{Form, FormAction, FormKind},
    widgets::{ConfirmDialog, DetailPanel, JobBoard, SearchBar, StatusBar},
    HelpOverlay, Theme,
};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What keyboard input is currently driving
#[derive(Debug)]
enum Mode {
    Browse,
    Search,
    Form(Form),
    ConfirmDelete { id: String, company: String },
}

/// Application state
pub struct App {
    // Configuration
    config: AppConfig,
    theme: Theme,

    // Data
    store: JobStore,
    /// Applications matching the current search, newest first
    jobs: Vec<JobRecord>,
    query: String,

    // Set by store listeners, read on the next tick
    dirty: Rc<Cell<bool>>,
    sync_status: Rc<RefCell<Option<SyncStatus>>>,
    subscriptions: Vec<Subscription>,

    // UI State
    mode: Mode,
    selected: usize,
    show_help: bool,
    should_quit: bool,

    message: Option<String>,
    // Error message to display (non-fatal)
    error_message: Option<String>,
}

impl App {
    /// Create a new App instance
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = open_store(&config)?;

        let dirty = Rc::new(Cell::new(false));
        let sync_status = Rc::new(RefCell::new(store.sync_status().cloned()));

        let mut subscriptions = Vec::new();
        let flag = Rc::clone(&dirty);
        subscriptions.push(store.subscribe(move |_| flag.set(true)));
        let status = Rc::clone(&sync_status);
        subscriptions.push(store.subscribe_sync_status(move |s| {
            *status.borrow_mut() = Some(s.clone());
        }));

        let mut app = App {
            config,
            theme: Theme::default(),
            store,
            jobs: Vec::new(),
            query: String::new(),
            dirty,
            sync_status,
            subscriptions,
            mode: Mode::Browse,
            selected: 0,
            show_help: false,
            should_quit: false,
            message: None,
            error_message: None,
        };
        app.refresh();

        // Merge with the remote copy once at startup
        if app.store.sync_all() {
            tracing::info!("startup sync started");
        }
        Ok(app)
    }

    /// Rebuild the visible list from the store
    fn refresh(&mut self) {
        let query = self.query.trim();
        self.jobs = self
            .store
            .get_all()
            .into_iter()
            .filter(|job| job.matches(query))
            .collect();
        if self.selected >= self.jobs.len() {
            self.selected = self.jobs.len().saturating_sub(1);
        }
    }

    /// Apply finished sync work and pick up collection changes
    fn tick(&mut self) {
        if let Err(e) = self.store.pump_sync_events() {
            tracing::error!(error = %e, "failed to apply sync result");
            self.set_error(format!("Sync error: {e}"));
        }
        if self.dirty.replace(false) {
            self.refresh();
        }
    }

    /// Set an error message to display (non-fatal)
    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    fn set_message(&mut self, message: String) {
        self.error_message = None;
        self.message = Some(message);
    }

    fn selected_job(&self) -> Option<&JobRecord> {
        self.jobs.get(self.selected)
    }

    /// Handle keyboard input
    fn handle_input(&mut self, key: KeyEvent) -> Result<()> {
        if self.show_help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return Ok(());
        }

        match &mut self.mode {
            Mode::Form(form) => match form.handle_key(key) {
                FormAction::Continue => {}
                FormAction::Cancel => self.mode = Mode::Browse,
                FormAction::Submit => self.submit_form()?,
            },
            Mode::Search => self.handle_search(key.code),
            Mode::ConfirmDelete { .. } => self.handle_confirm(key.code)?,
            Mode::Browse => self.handle_browse(key.code)?,
        }
        Ok(())
    }

    fn handle_browse(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => self.show_help = true,
            KeyCode::Down | KeyCode::Char('j') => {
                if !self.jobs.is_empty() {
                    self.selected = (self.selected + 1) % self.jobs.len();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if !self.jobs.is_empty() {
                    self.selected = self.selected.checked_sub(1).unwrap_or(self.jobs.len() - 1);
                }
            }
            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Esc => {
                self.query.clear();
                self.message = None;
                self.error_message = None;
                self.refresh();
            }
            KeyCode::Char('a') => {
                self.mode = Mode::Form(Form::add_job(Utc::now().date_naive()));
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(job) = self.selected_job() {
                    self.mode = Mode::Form(Form::edit_job(job));
                }
            }
            KeyCode::Char('d') => {
                if let Some(job) = self.selected_job() {
                    self.mode = Mode::ConfirmDelete {
                        id: job.id.clone(),
                        company: job.company.clone(),
                    };
                }
            }
            KeyCode::Char(']') | KeyCode::Char('[') => {
                if let Some(job) = self.selected_job() {
                    let status = if key == KeyCode::Char(']') {
                        job.status.next()
                    } else {
                        job.status.prev()
                    };
                    let patch = JobPatch {
                        status: Some(status),
                        ..JobPatch::new(job.id.clone())
                    };
                    self.store.update(patch)?;
                }
            }
            KeyCode::Char('x') => {
                let path = self.store.export_data(&self.config.export_dir)?;
                self.set_message(format!("Exported to {}", path.display()));
            }
            KeyCode::Char('i') => {
                self.mode = Mode::Form(Form::import(&self.config.export_dir));
            }
            KeyCode::Char('S') => {
                self.mode = Mode::Form(Form::settings(self.store.settings()));
            }
            KeyCode::Char('s') => {
                if !self.store.sync_enabled() {
                    self.set_message("Sync is off. Press S to add a GitHub token".to_string());
                } else if !self.store.sync_all() {
                    self.set_message("Sync already in progress".to_string());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_search(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => self.query.push(c),
            KeyCode::Backspace => {
                self.query.pop();
            }
            KeyCode::Enter => self.mode = Mode::Browse,
            KeyCode::Esc => {
                self.query.clear();
                self.mode = Mode::Browse;
            }
            _ => return,
        }
        self.selected = 0;
        self.refresh();
    }

    fn handle_confirm(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let Mode::ConfirmDelete { id, company } =
                    std::mem::replace(&mut self.mode, Mode::Browse)
                else {
                    return Ok(());
                };
                if self.store.delete(&id)? {
                    self.set_message(format!("Deleted {company}"));
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.mode = Mode::Browse,
            _ => {}
        }
        Ok(())
    }

    /// Apply a submitted form. Validation errors keep the form open.
    fn submit_form(&mut self) -> Result<()> {
        let Mode::Form(mut form) = std::mem::replace(&mut self.mode, Mode::Browse) else {
            return Ok(());
        };

        let outcome = match &form.kind {
            FormKind::AddJob => form.to_new_record().map(|record| {
                let added = self.store.add(record);
                added.map(|job| format!("Added {}", job.company))
            }),
            FormKind::EditJob { id } => form.to_patch().map(|patch| {
                self.store
                    .update(patch)
                    .map(|found| match self.store.get(id) {
                        Some(job) if found => format!("Saved {}", job.company),
                        _ => "Application no longer exists".to_string(),
                    })
            }),
            FormKind::Settings => {
                let settings = form.to_settings();
                let enabled = settings.sync_enabled();
                Ok(self.store.save_settings(settings).map(|_| {
                    let message = if enabled {
                        "Settings saved, syncing"
                    } else {
                        "Settings saved, sync is off"
                    };
                    message.to_string()
                }))
            }
            FormKind::Import => form.import_path().map(|path| {
                self.store
                    .import_data(&path)
                    .map(|count| format!("Imported {count} applications"))
            }),
        };

        match outcome {
            Ok(Ok(message)) => {
                self.selected = 0;
                self.set_message(message);
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, form = form.title().trim(), "form action failed");
                form.error = Some(e.to_string());
                self.mode = Mode::Form(form);
            }
            Err(invalid) => {
                form.error = Some(invalid);
                self.mode = Mode::Form(form);
            }
        }
        Ok(())
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let size = frame.area();

        // Main layout: search, body, footer
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar
                Constraint::Min(5),    // Body
                Constraint::Length(2), // Status bar
            ])
            .split(size);

        // Body layout: board (left) and details (right)
        let body_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[1]);

        let searching = matches!(self.mode, Mode::Search);
        SearchBar::new(&self.query, searching, &self.theme).render(frame, main_chunks[0]);

        let board = JobBoard::new(&self.jobs, self.selected, &self.theme);
        board.render(frame, body_chunks[0], matches!(self.mode, Mode::Browse));

        DetailPanel::new(self.selected_job(), &self.theme).render(frame, body_chunks[1]);

        let sync_status = self.sync_status.borrow();
        let status_bar = StatusBar::new(
            self.store.len(),
            sync_status.as_ref(),
            self.message.as_deref(),
            self.error_message.as_deref(),
            &self.theme,
        );
        status_bar.render(frame, main_chunks[2]);

        match &self.mode {
            Mode::Form(form) => form.render(frame, size, &self.theme),
            Mode::ConfirmDelete { company, .. } => {
                let prompt = format!("Delete the application at {company}?");
                ConfirmDialog::new(prompt, &self.theme).render(frame, size);
            }
            Mode::Browse | Mode::Search => {}
        }

        // Render help overlay if active
        if self.show_help {
            let help = HelpOverlay::new(&self.theme);
            help.render(frame, size);
        }
    }

    /// Detach store listeners before the store is dropped
    fn shutdown(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
    }
}

/// Restore terminal to normal state
fn restore_terminal() {
    // Best effort cleanup - ignore errors since we may be in a panic
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Run the TUI application
pub fn run(config: AppConfig) -> Result<()> {
    // Open the store before touching the terminal so load errors print normally
    let mut app = App::new(config).context("Failed to initialize application")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        restore_terminal();
        return Err(e).context("Failed to setup terminal");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            restore_terminal();
            return Err(e).context("Failed to create terminal");
        }
    };

    let result = run_main_loop(&mut terminal, &mut app);

    // Always restore terminal, regardless of result
    restore_terminal();
    terminal.show_cursor().ok();
    app.shutdown();

    result
}

/// Main application loop
fn run_main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.tick();

        // Render - if this fails, we should exit
        terminal.draw(|f| app.render(f))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too
                if key.kind == KeyEventKind::Press {
                    if let Err(e) = app.handle_input(key) {
                        tracing::error!(error = %e, "action failed");
                        app.set_error(format!("{e}"));
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
