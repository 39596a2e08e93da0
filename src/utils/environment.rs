use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Environment variable holding an OAuth access token for the Sheets API
pub const ACCESS_TOKEN_ENV: &str = "TERMBASE_ACCESS_TOKEN";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "TERMBASE_CONFIG";

/// Get the default config file path (`<config_dir>/termbase/config.toml`).
///
/// `TERMBASE_CONFIG` takes precedence over the platform config directory.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    let config_dir = dirs::config_dir().context("Failed to get platform config directory")?;
    Ok(config_dir.join("termbase").join("config.toml"))
}

/// Read a non-empty, trimmed value from the environment.
pub fn read_env_token(var: &str) -> Option<String> {
    env::var(var).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
