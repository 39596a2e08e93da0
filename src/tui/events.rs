use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::Mode;

/// User actions from keyboard events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    /// Esc: clear input or quit in search mode, close the popup otherwise
    Escape,
    Search,
    NextMatch,
    PreviousMatch,
    CopyToClipboard,
    OpenAddForm,
    /// F2: ask for another file or sheet to switch to
    OpenSourceForm,
    /// Ctrl+O: show the active file or sheet in its own application
    OpenLocation,
    SubmitForm,
    NextField,
    PreviousField,
    Refresh,
    ToggleHelp,
    RetrySave,
    Input(char),
    DeleteChar,
    None,
}

/// Poll for keyboard events and convert to actions for the current mode
pub fn poll_event(timeout: Duration, mode: Mode) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
        && key.kind != KeyEventKind::Release
    {
        return Ok(key_to_action(key, mode));
    }
    Ok(Action::None)
}

pub(crate) fn key_to_action(key: KeyEvent, mode: Mode) -> Action {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return Action::Quit;
    }

    match mode {
        Mode::Search => search_key(key),
        Mode::AddForm => form_key(key),
        Mode::ChangeSource => source_key(key),
        Mode::Help => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::F(1) | KeyCode::F(3) => Action::ToggleHelp,
            _ => Action::None,
        },
    }
}

fn search_key(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => Action::Escape,
        (KeyCode::Enter, _) => Action::Search,

        // Match navigation
        (KeyCode::Tab, _) | (KeyCode::Right, _) => Action::NextMatch,
        (KeyCode::BackTab, _) | (KeyCode::Left, _) => Action::PreviousMatch,

        (KeyCode::Char('y'), KeyModifiers::CONTROL) => Action::CopyToClipboard,
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => Action::OpenAddForm,
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => Action::RetrySave,
        (KeyCode::Char('o'), KeyModifiers::CONTROL) => Action::OpenLocation,
        (KeyCode::Char('r'), KeyModifiers::CONTROL) | (KeyCode::F(5), _) => Action::Refresh,
        (KeyCode::F(1), _) | (KeyCode::F(3), _) => Action::ToggleHelp,
        (KeyCode::F(2), _) => Action::OpenSourceForm,

        (KeyCode::Char(c), modifiers) if is_text_input(modifiers) => Action::Input(c),
        (KeyCode::Backspace, _) => Action::DeleteChar,

        _ => Action::None,
    }
}

fn form_key(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => Action::Escape,
        (KeyCode::Enter, _) => Action::SubmitForm,
        (KeyCode::Tab, _) | (KeyCode::Down, _) => Action::NextField,
        (KeyCode::BackTab, _) | (KeyCode::Up, _) => Action::PreviousField,
        (KeyCode::Char(c), modifiers) if is_text_input(modifiers) => Action::Input(c),
        (KeyCode::Backspace, _) => Action::DeleteChar,
        _ => Action::None,
    }
}

fn source_key(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => Action::Escape,
        (KeyCode::Enter, _) => Action::SubmitForm,
        (KeyCode::Char(c), modifiers) if is_text_input(modifiers) => Action::Input(c),
        (KeyCode::Backspace, _) => Action::DeleteChar,
        _ => Action::None,
    }
}

/// Whether a character key with `modifiers` types text. AltGr arrives as
/// Ctrl+Alt on Windows and some terminals, so that combination counts too.
fn is_text_input(modifiers: KeyModifiers) -> bool {
    let modifiers = modifiers.difference(KeyModifiers::SHIFT);
    modifiers.is_empty() || modifiers == KeyModifiers::CONTROL | KeyModifiers::ALT
}
