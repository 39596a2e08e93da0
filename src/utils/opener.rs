use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::debug;

/// Something that can show a termbase location (file path or URL) to the user.
/// The TUI holds one of these so tests can swap in a fake.
pub trait LocationOpener {
    fn open(&mut self, location: &str) -> Result<()>;
}

/// Hands the location to the desktop's default handler.
#[derive(Debug, Default)]
pub struct SystemOpener;

impl LocationOpener for SystemOpener {
    fn open(&mut self, location: &str) -> Result<()> {
        open_location(location)
    }
}

#[cfg(target_os = "linux")]
fn opener_command(location: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(location);
    command
}

#[cfg(target_os = "macos")]
fn opener_command(location: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(location);
    command
}

#[cfg(target_os = "windows")]
fn opener_command(location: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", location]);
    command
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn opener_command(location: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(location);
    command
}

/// Open a file or URL with the system's default application.
///
/// The launcher runs detached; only a failure to start it is reported.
pub fn open_location(location: &str) -> Result<()> {
    let location = location.trim();
    if location.is_empty() {
        bail!("Nothing to open");
    }

    let mut command = opener_command(location);
    debug!(location, program = ?command.get_program(), "Opening location");
    let mut child = command
        .spawn()
        .with_context(|| format!("Failed to launch an opener for {}", location))?;

    // Reap the launcher without blocking the caller
    std::thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(())
}
