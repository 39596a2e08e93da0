//! Configuration for selecting the termbase source.
//!
//! The config file is TOML, by default at `<config_dir>/termbase/config.toml`:
//!
//! ```toml
//! [source]
//! kind = "file"
//! path = "~/glossary.xlsx"
//! ```
//!
//! or, for a Google Sheet:
//!
//! ```toml
//! [source]
//! kind = "remote"
//! sheet_id = "1bl5koCGUwI_..."
//! worksheet = "Terms"        # optional, defaults to the first sheet
//! token_file = "~/.termbase-token"  # optional, else TERMBASE_ACCESS_TOKEN
//! ```
//!
//! Command-line flags override whatever the file says.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::utils::expand_tilde;

/// Where the termbase lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    File {
        path: PathBuf,
    },
    Remote {
        sheet_id: String,
        #[serde(default)]
        worksheet: Option<String>,
        #[serde(default)]
        token_file: Option<PathBuf>,
    },
}

impl SourceConfig {
    /// Interpret a source typed by the user: a file path, a Google Sheets URL, or
    /// a bare spreadsheet ID. A new sheet keeps `current`'s token file.
    pub fn from_input(input: &str, current: Option<&SourceConfig>) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("Enter a file path or spreadsheet ID");
        }

        let token_file = match current {
            Some(Self::Remote { token_file, .. }) => token_file.clone(),
            _ => None,
        };

        let source = if let Some(sheet_id) = sheet_id_from_url(input) {
            Self::Remote { sheet_id, worksheet: None, token_file }
        } else if looks_like_path(input) {
            Self::File { path: PathBuf::from(input) }
        } else {
            Self::Remote { sheet_id: input.to_string(), worksheet: None, token_file }
        };

        Ok(source.resolved())
    }

    /// Expand `~` in any paths.
    pub fn resolved(self) -> Self {
        match self {
            Self::File { path } => Self::File { path: expand_tilde(&path) },
            Self::Remote { sheet_id, worksheet, token_file } => Self::Remote {
                sheet_id,
                worksheet,
                token_file: token_file.map(|p| expand_tilde(&p)),
            },
        }
    }
}

/// Spreadsheet ID from a `https://docs.google.com/spreadsheets/d/<id>/...` URL.
fn sheet_id_from_url(input: &str) -> Option<String> {
    let (_, rest) = input.split_once("/spreadsheets/d/")?;
    let id = rest.split(['/', '?', '#']).next()?;
    (!id.is_empty()).then(|| id.to_string())
}

/// Sheet IDs never contain separators or dots.
fn looks_like_path(input: &str) -> bool {
    input.starts_with('~')
        || input.contains('/')
        || input.contains(std::path::MAIN_SEPARATOR)
        || Path::new(input).extension().is_some()
}

/// Contents of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: Option<SourceConfig>,
}

/// Source selection given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceOverrides {
    pub file: Option<PathBuf>,
    pub sheet_id: Option<String>,
    pub worksheet: Option<String>,
}

impl Config {
    /// Parse a config file. A missing file yields the default (empty) config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Decide the active source: command-line flags first, then the config file.
    pub fn resolve_source(&self, overrides: &SourceOverrides) -> Result<SourceConfig> {
        if overrides.file.is_some() && overrides.sheet_id.is_some() {
            bail!("--file and --sheet-id cannot be used together");
        }

        let source = if let Some(path) = &overrides.file {
            SourceConfig::File { path: path.clone() }
        } else if let Some(sheet_id) = &overrides.sheet_id {
            // Keep a configured token file when only the sheet changes
            let token_file = match &self.source {
                Some(SourceConfig::Remote { token_file, .. }) => token_file.clone(),
                _ => None,
            };
            SourceConfig::Remote {
                sheet_id: sheet_id.clone(),
                worksheet: overrides.worksheet.clone(),
                token_file,
            }
        } else {
            match &self.source {
                Some(SourceConfig::Remote { sheet_id, token_file, .. })
                    if overrides.worksheet.is_some() =>
                {
                    SourceConfig::Remote {
                        sheet_id: sheet_id.clone(),
                        worksheet: overrides.worksheet.clone(),
                        token_file: token_file.clone(),
                    }
                }
                Some(source) => source.clone(),
                None => bail!(
                    "No termbase source configured. Pass --file <PATH> or --sheet-id <ID>, \
                     or add a [source] section to the config file"
                ),
            }
        };

        Ok(source.resolved())
    }
}
