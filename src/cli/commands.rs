use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use crate::clipboard::copy_to_clipboard;
use crate::config::{Config, SourceConfig, SourceOverrides};
use crate::error::TermbaseError;
use crate::index::validate_entry;
use crate::logging::init_logging;
use crate::models::QuerySession;
use crate::store::open_store;
use crate::termbase::Termbase;
use crate::tui::run_interactive;
use crate::utils::{expand_tilde, get_config_path, open_location, sanitize_cell};

#[derive(Parser)]
#[command(name = "termbase")]
#[command(version = "0.1.0")]
#[command(about = "Look up terms in a personal glossary spreadsheet", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: <config dir>/termbase/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use a local spreadsheet file (.xlsx, .csv, ...) as the termbase
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "sheet_id")]
    pub file: Option<PathBuf>,

    /// Use a Google Sheets spreadsheet as the termbase
    #[arg(long, global = true, value_name = "ID")]
    pub sheet_id: Option<String>,

    /// Worksheet name within the Google Sheet (default: first sheet)
    #[arg(long, global = true, value_name = "NAME")]
    pub worksheet: Option<String>,

    /// Print debug logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up every translation of a term
    Lookup {
        term: String,

        /// Copy the first target term to the clipboard
        #[arg(long)]
        copy: bool,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a new entry and save it to the termbase
    Add {
        source: String,
        target: String,

        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Show statistics about the termbase
    Stats,
    /// Open the termbase file or Google Sheet in its default application
    Open {
        /// Print the path or URL instead of opening it
        #[arg(long)]
        print: bool,
    },
    /// Browse the termbase in a terminal UI
    Interactive,
}

impl Cli {
    fn overrides(&self) -> SourceOverrides {
        SourceOverrides {
            file: self.file.clone(),
            sheet_id: self.sheet_id.clone(),
            worksheet: self.worksheet.clone(),
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, Some(Commands::Interactive));
    init_logging(cli.verbose, interactive);

    match &cli.command {
        Some(Commands::Lookup { term, copy, json }) => {
            lookup(&cli, term, *copy, *json)?;
        }
        Some(Commands::Add { source, target, notes }) => {
            add(&cli, source, target, notes)?;
        }
        Some(Commands::Stats) => {
            show_stats(&cli)?;
        }
        Some(Commands::Open { print }) => {
            open_source(&cli, *print)?;
        }
        Some(Commands::Interactive) => {
            interactive_session(&cli)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Decide which source to use from config and flags.
fn resolve_source(cli: &Cli) -> Result<SourceConfig> {
    let config_path = match &cli.config {
        Some(path) => expand_tilde(path),
        None => get_config_path()?,
    };
    let config = Config::load(&config_path)?;
    config.resolve_source(&cli.overrides())
}

/// Build the termbase context for `source` without loading it.
fn build_termbase(source: &SourceConfig) -> Result<Termbase> {
    let store = open_store(source).context("Failed to open termbase source")?;
    Ok(Termbase::new(store))
}

fn open_termbase(cli: &Cli) -> Result<Termbase> {
    let mut termbase = build_termbase(&resolve_source(cli)?)?;
    termbase.refresh()?;
    Ok(termbase)
}

fn lookup(cli: &Cli, term: &str, copy: bool, json: bool) -> Result<()> {
    if term.trim().is_empty() {
        bail!("Search term must not be empty");
    }

    let termbase = open_termbase(cli)?;
    let session = termbase.query(term);

    if json {
        println!("{}", serde_json::to_string_pretty(session.matches())?);
    } else {
        print_session(&session);
    }

    if copy && let Some(record) = session.current() {
        match copy_to_clipboard(record.target_term()) {
            Ok(()) => eprintln!("Copied '{}' to clipboard", sanitize_cell(record.target_term(), false)),
            Err(e) => eprintln!("Warning: {:#}", e),
        }
    }

    Ok(())
}

fn print_session(session: &QuerySession) {
    if session.is_empty() {
        println!("Term not found: {}", sanitize_cell(session.term(), false));
        return;
    }

    let total = session.len();
    for (i, record) in session.matches().iter().enumerate() {
        println!(
            "{}/{}  {} → {}",
            i + 1,
            total,
            sanitize_cell(record.source_term(), false),
            sanitize_cell(record.target_term(), false)
        );
        if !record.notes().is_empty() {
            println!("     Notes: {}", sanitize_cell(record.notes(), false));
        }
    }
}

fn add(cli: &Cli, source: &str, target: &str, notes: &str) -> Result<()> {
    // Reject bad input before touching the backing resource
    validate_entry(source, target, notes)?;

    let mut termbase = open_termbase(cli)?;
    match termbase.add_entry(source, target, notes) {
        Ok(record) => {
            println!("Added: {}", sanitize_cell(&record.to_string(), false));
            println!("Saved to {}", termbase.source_description());
            Ok(())
        }
        Err(TermbaseError::Persist(e)) => {
            bail!("Failed to save '{}' to {}: {}", e.record, e.resource, e.source)
        }
        Err(e) => Err(e.into()),
    }
}

fn show_stats(cli: &Cli) -> Result<()> {
    let termbase = open_termbase(cli)?;
    let stats = termbase.stats();

    println!("Termbase Statistics");
    println!("===================");
    println!("Source: {}", stats.source);
    println!("Total entries: {}", stats.records);
    println!("Distinct source terms: {}", stats.distinct_terms);
    println!("Terms with multiple translations: {}", stats.multi_match_terms);

    Ok(())
}

fn open_source(cli: &Cli, print: bool) -> Result<()> {
    // The location is known without loading the termbase
    let location = build_termbase(&resolve_source(cli)?)?.location();

    if print {
        println!("{}", location);
        return Ok(());
    }

    println!("Opening {}", location);
    open_location(&location)
}

fn interactive_session(cli: &Cli) -> Result<()> {
    let source = resolve_source(cli)?;
    let mut termbase = build_termbase(&source)?;

    // A failed load is shown in the UI; Ctrl+R retries it
    let load_error = termbase.refresh().err().map(|e| e.to_string());

    run_interactive(termbase, Some(source), load_error)
}
