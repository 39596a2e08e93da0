use std::borrow::Cow;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BackendError;

/// Maximum termbase file size (50MB)
pub const MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Validates that a termbase file is within the size limit before it is read.
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read (including a missing file)
/// - The file is larger than [`MAX_FILE_SIZE_BYTES`]
pub fn validate_file_size(path: &Path) -> Result<u64, BackendError> {
    let metadata = fs::metadata(path).map_err(|e| BackendError::io(path, e))?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        return Err(BackendError::TooLarge {
            path: path.to_path_buf(),
            size: file_size,
            max: MAX_FILE_SIZE_BYTES,
        });
    }

    Ok(file_size)
}

/// Expands a leading `~` to the home directory. Other paths are returned as-is.
pub fn expand_tilde(path: &Path) -> PathBuf {
    expand_tilde_internal(path, dirs::home_dir())
}

pub(crate) fn expand_tilde_internal(path: &Path, home: Option<PathBuf>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };

    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use termbase::utils::format_path_with_tilde;
///
/// let path = PathBuf::from("/Users/alice/glossary.xlsx");
/// // Returns "~/glossary.xlsx" if HOME=/Users/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && !home.is_empty()
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
