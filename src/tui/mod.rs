//! Interactive terminal UI for looking up and adding terms
mod app;
mod events;
mod layout;
mod rendering;
mod terminal;

use anyhow::Result;
pub use app::App;
use terminal::TerminalManager;

use crate::config::SourceConfig;
use crate::termbase::Termbase;

/// Run the interactive TUI. `source` is what the termbase was opened from and
/// seeds the change-source popup; `load_error` is shown on startup when the
/// initial load failed.
pub fn run_interactive(
    termbase: Termbase,
    source: Option<SourceConfig>,
    load_error: Option<String>,
) -> Result<()> {
    let mut app = App::new(termbase);
    if let Some(source) = source {
        app = app.with_source(source);
    }
    if let Some(error) = load_error {
        app.report_error(error);
    }

    let mut manager = TerminalManager::new()?;
    let res = app.run(manager.terminal_mut());
    manager.restore()?;

    res
}
