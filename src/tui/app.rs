//! TUI application state and event handling.
//!
//! The `App` owns the [`Termbase`] and the current [`QuerySession`], and runs the
//! event loop via `run()`. It has three modes:
//!
//! - **Search**: type a term, Enter to look it up, Tab/arrows to cycle through
//!   its translations
//! - **AddForm**: popup for a new entry, pre-filled with the typed term
//! - **ChangeSource**: popup asking for a file path or Google Sheet to switch to
//! - **Help**: key reference popup
//!
//! Feedback (copy, save, refresh, errors) goes to a transient status message.

use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;

use super::events::{Action, poll_event};
use super::rendering::{RenderState, render_ui};
use crate::clipboard::{ClipboardProvider, SystemClipboard, copy_with_provider};
use crate::config::SourceConfig;
use crate::error::TermbaseError;
use crate::models::{Direction, QuerySession, TermRecord, advance};
use crate::store::open_store;
use crate::termbase::Termbase;
use crate::utils::{LocationOpener, SystemOpener};

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Longest accepted input in any text field
const MAX_INPUT_CHARS: usize = 256;

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Search,
    AddForm,
    ChangeSource,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Source,
    Target,
    Notes,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            Self::Source => Self::Target,
            Self::Target => Self::Notes,
            Self::Notes => Self::Source,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::Source => Self::Notes,
            Self::Target => Self::Source,
            Self::Notes => Self::Target,
        }
    }
}

/// Contents of the add-entry popup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddForm {
    pub source: String,
    pub target: String,
    pub notes: String,
    pub focus: FormField,
}

impl AddForm {
    fn prefilled(source: &str) -> Self {
        let source = source.trim().to_string();
        let focus = if source.is_empty() { FormField::Source } else { FormField::Target };
        Self { source, focus, ..Default::default() }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Source => &mut self.source,
            FormField::Target => &mut self.target,
            FormField::Notes => &mut self.notes,
        }
    }
}

pub struct App {
    termbase: Termbase,
    clipboard: Box<dyn ClipboardProvider>,
    opener: Box<dyn LocationOpener>,
    /// Configuration the active store was opened from, when known
    source: Option<SourceConfig>,
    input: String,
    session: QuerySession,
    mode: Mode,
    form: AddForm,
    source_input: String,
    /// Entries that are in the index but failed to save, oldest first
    unsaved: Vec<TermRecord>,
    should_quit: bool,
    status_message: Option<StatusMessage>,
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    pub fn new(termbase: Termbase) -> Self {
        Self::with_clipboard(termbase, Box::new(SystemClipboard::new()))
    }

    pub fn with_clipboard(termbase: Termbase, clipboard: Box<dyn ClipboardProvider>) -> Self {
        Self {
            termbase,
            clipboard,
            opener: Box::new(SystemOpener),
            source: None,
            input: String::new(),
            session: QuerySession::default(),
            mode: Mode::Search,
            form: AddForm::default(),
            source_input: String::new(),
            unsaved: Vec::new(),
            should_quit: false,
            status_message: None,
            needs_redraw: true,
            last_draw_time: Instant::now(),
        }
    }

    /// Record the configuration the termbase's store came from.
    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_opener(mut self, opener: Box<dyn LocationOpener>) -> Self {
        self.opener = opener;
        self
    }

    /// Show an error from before the event loop started (e.g. initial load).
    pub fn report_error(&mut self, text: impl Into<String>) {
        self.set_status(format!("✗ {}", text.into()), MessageType::Error, STATUS_ERROR_DURATION_MS);
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    fn success(&mut self, text: impl Into<String>) {
        self.set_status(format!("✓ {}", text.into()), MessageType::Success, STATUS_SUCCESS_DURATION_MS);
    }

    fn error(&mut self, text: impl Into<String>) {
        self.set_status(format!("✗ {}", text.into()), MessageType::Error, STATUS_ERROR_DURATION_MS);
    }

    /// Check and clear expired status messages
    fn check_and_clear_expired_status(&mut self) {
        let should_clear = self
            .status_message
            .as_ref()
            .map(|msg| Instant::now() >= msg.expires_at)
            .unwrap_or(false);
        if should_clear {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            self.check_and_clear_expired_status();

            // Draw if dirty or if it's been >100ms (for terminal resize handling)
            let now = Instant::now();
            let elapsed = now.duration_since(self.last_draw_time);
            if self.needs_redraw || elapsed >= Duration::from_millis(100) {
                let snapshot = self.termbase.snapshot();
                let source = self.termbase.source_description();
                terminal.draw(|f| {
                    let state = RenderState {
                        input: &self.input,
                        session: &self.session,
                        source: &source,
                        load_state: self.termbase.state(),
                        record_count: snapshot.record_count(),
                        mode: self.mode,
                        form: &self.form,
                        source_input: &self.source_input,
                        unsaved_count: self.unsaved.len(),
                        status_message: self.status_message.as_ref(),
                    };
                    render_ui(f, &state);
                })?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(100), self.mode)?;
            self.handle_action(action);
        }

        Ok(())
    }

    /// Handle a user action (extracted for testing)
    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Escape => self.escape(),
            Action::Search => self.search(),
            Action::NextMatch => self.navigate(Direction::Forward),
            Action::PreviousMatch => self.navigate(Direction::Backward),
            Action::CopyToClipboard => self.copy_current(),
            Action::OpenAddForm => {
                let seed = if self.input.trim().is_empty() { self.session.term() } else { &self.input };
                self.form = AddForm::prefilled(seed);
                self.mode = Mode::AddForm;
                self.needs_redraw = true;
            }
            Action::SubmitForm => match self.mode {
                Mode::AddForm => self.submit_form(),
                Mode::ChangeSource => self.change_source(),
                Mode::Search | Mode::Help => {}
            },
            Action::OpenSourceForm => {
                self.source_input.clear();
                self.mode = Mode::ChangeSource;
                self.needs_redraw = true;
            }
            Action::OpenLocation => self.open_location(),
            Action::NextField => {
                self.form.focus = self.form.focus.next();
                self.needs_redraw = true;
            }
            Action::PreviousField => {
                self.form.focus = self.form.focus.previous();
                self.needs_redraw = true;
            }
            Action::Refresh => self.refresh(),
            Action::ToggleHelp => {
                self.mode = if self.mode == Mode::Help { Mode::Search } else { Mode::Help };
                self.needs_redraw = true;
            }
            Action::RetrySave => self.retry_save(),
            Action::Input(c) => self.push_char(c),
            Action::DeleteChar => self.delete_char(),
            Action::None => {}
        }
    }

    fn escape(&mut self) {
        match self.mode {
            Mode::AddForm | Mode::Help => self.mode = Mode::Search,
            Mode::ChangeSource => {
                self.source_input.clear();
                self.mode = Mode::Search;
            }
            Mode::Search if self.input.is_empty() => self.should_quit = true,
            Mode::Search => {
                self.input.clear();
                self.session = QuerySession::default();
            }
        }
        self.needs_redraw = true;
    }

    fn search(&mut self) {
        if self.input.trim().is_empty() {
            self.error("Enter a term to search");
            return;
        }

        self.session = self.termbase.query(&self.input);
        self.needs_redraw = true;
    }

    fn navigate(&mut self, direction: Direction) {
        if !self.session.has_alternatives() {
            return;
        }
        let session = std::mem::take(&mut self.session);
        self.session = advance(session, direction);
        self.needs_redraw = true;
    }

    fn copy_current(&mut self) {
        let Some(target) = self.session.current().map(|r| r.target_term().to_string()) else {
            self.error("No translation to copy");
            return;
        };

        match copy_with_provider(&target, self.clipboard.as_mut()) {
            Ok(()) => self.success(format!("Copied '{}'", target)),
            Err(e) => self.error(format!("Clipboard error: {}", e)),
        }
    }

    fn submit_form(&mut self) {
        let AddForm { source, target, notes, .. } = self.form.clone();

        match self.termbase.add_entry(&source, &target, &notes) {
            Ok(record) => {
                self.show_added(&record);
                self.success(format!("Added and saved: {}", record));
            }
            Err(TermbaseError::Persist(e)) => {
                self.show_added(&e.record);
                self.error(format!("{} (Ctrl+S to retry)", e));
                self.unsaved.push(e.record);
            }
            Err(e) => {
                // Validation failures keep the form open for correction
                self.error(e.to_string());
            }
        }
    }

    /// Close the form and show the group the new record landed in, positioned on it.
    fn show_added(&mut self, record: &TermRecord) {
        self.mode = Mode::Search;
        self.form = AddForm::default();
        self.input = record.source_term().to_string();

        // New records go to the end of their group
        let session = self.termbase.query(record.source_term());
        self.session = advance(session, Direction::Backward);
        self.needs_redraw = true;
    }

    /// Try to save every pending entry again, in the order they were added.
    fn retry_save(&mut self) {
        if self.unsaved.is_empty() {
            self.error("Nothing to save");
            return;
        }

        let mut saved = Vec::new();
        let mut last_error = None;
        for record in std::mem::take(&mut self.unsaved) {
            match self.termbase.persist(&record) {
                Ok(()) => saved.push(record),
                Err(e) => {
                    last_error = Some(e);
                    self.unsaved.push(record);
                }
            }
        }

        match (last_error, saved.as_slice()) {
            (None, [record]) => self.success(format!("Saved: {}", record)),
            (None, _) => self.success(format!("Saved {} entries", saved.len())),
            (Some(e), _) => {
                self.error(format!("{} ({} still unsaved, Ctrl+S to retry)", e, self.unsaved.len()))
            }
        }
    }

    fn refresh(&mut self) {
        match self.termbase.refresh() {
            Ok(stats) => {
                let discarded = std::mem::take(&mut self.unsaved).len();
                if discarded > 0 {
                    self.error(format!("Reloaded; {} unsaved entries discarded", discarded));
                } else {
                    self.success(format!("Reloaded {} entries", stats.indexed));
                }
                if !self.session.term().is_empty() {
                    self.session = self.termbase.query(&self.session.term().to_string());
                }
            }
            Err(e) => self.error(e.to_string()),
        }
    }

    /// Open the source named in the popup and make it active once it loads.
    ///
    /// On failure the popup stays open and the current termbase is untouched.
    fn change_source(&mut self) {
        let result = SourceConfig::from_input(&self.source_input, self.source.as_ref())
            .and_then(|source| -> Result<_> {
                let store = open_store(&source)?;
                let stats = self.termbase.switch_source(store)?;
                Ok((source, stats))
            });

        match result {
            Ok((source, stats)) => {
                self.source = Some(source);
                self.source_input.clear();
                self.input.clear();
                self.session = QuerySession::default();
                self.mode = Mode::Search;
                self.needs_redraw = true;

                let opened =
                    format!("Opened {} ({} entries)", self.termbase.source_description(), stats.indexed);
                // Pending entries belong to the previous source
                let discarded = std::mem::take(&mut self.unsaved).len();
                if discarded > 0 {
                    self.error(format!("{}; {} unsaved entries discarded", opened, discarded));
                } else {
                    self.success(opened);
                }
            }
            Err(e) => self.error(format!("{:#}", e)),
        }
    }

    fn open_location(&mut self) {
        let location = self.termbase.location();
        match self.opener.open(&location) {
            Ok(()) => self.success(format!("Opened {}", location)),
            Err(e) => self.error(format!("{:#}", e)),
        }
    }

    fn push_char(&mut self, c: char) {
        let field = match self.mode {
            Mode::Search => &mut self.input,
            Mode::AddForm => self.form.focused_mut(),
            Mode::ChangeSource => &mut self.source_input,
            Mode::Help => return,
        };
        if field.chars().count() < MAX_INPUT_CHARS {
            field.push(c);
            self.needs_redraw = true;
        }
    }

    fn delete_char(&mut self) {
        let field = match self.mode {
            Mode::Search => &mut self.input,
            Mode::AddForm => self.form.focused_mut(),
            Mode::ChangeSource => &mut self.source_input,
            Mode::Help => return,
        };
        if field.pop().is_some() {
            self.needs_redraw = true;
        }
    }
}
