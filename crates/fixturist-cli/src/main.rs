//! # fixturist-cli
//!
//! Binary entry point for inspecting a fixture tree.
//!
//! This crate provides:
//! - CLI argument parsing using `clap`
//! - Configuration loading (falls back to defaults when no file exists)
//! - `fixturist list`, `fixturist show` and `fixturist clean`

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fixturist_core::{Configuration, FixtureKey, FixtureRecord, FixtureStore, FixturistConfig};
use std::io::{IsTerminal, stdout};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Color output mode for terminal display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    /// Automatically detect if stdout is a TTY
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorMode {
    /// Returns true if colors should be used based on mode and terminal detection.
    fn should_use_colors(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => stdout().is_terminal(),
        }
    }
}

/// Output format for the list command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for programmatic access
    Json,
}

/// ANSI color codes for terminal output.
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
}

/// Fixturist - inspect recorded response fixtures
#[derive(Parser, Debug)]
#[command(name = "fixturist", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "fixturist.yml", global = true)]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Color output mode (auto, always, never)
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List recorded fixtures
    List(ListArgs),

    /// Print one fixture as JSON
    Show(ShowArgs),

    /// Delete recorded fixtures
    Clean(CleanArgs),
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Only list fixtures for this handler namespace (e.g. app/api/v1/users)
    #[arg(long)]
    handler: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct ShowArgs {
    /// Fixture key as namespace/action/identifier (a trailing .json is accepted)
    key: String,
}

#[derive(Parser, Debug)]
struct CleanArgs {
    /// Only delete fixtures for this handler namespace
    #[arg(long)]
    handler: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = load_store(&cli.config)?;
    let use_colors = cli.color.should_use_colors();

    match cli.command {
        Commands::List(args) => list_command(&store, use_colors, args),
        Commands::Show(args) => show_command(&store, args),
        Commands::Clean(args) => clean_command(&store, use_colors, args),
    }
}

/// Resolves the fixture store from the configuration file, or defaults if absent.
fn load_store(config_path: &Path) -> Result<FixtureStore> {
    let config = if config_path.exists() {
        Configuration::load(config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        warn!("Config file {:?} not found, using defaults", config_path);
        Configuration::from_config(FixturistConfig::default())?
    };
    debug!(root = %config.store().root().display(), "Using fixture tree");
    Ok(config.store().clone())
}

fn list_command(store: &FixtureStore, use_colors: bool, args: ListArgs) -> Result<()> {
    let keys = match args.handler.as_deref() {
        Some(namespace) => store.list_namespace(namespace)?,
        None => store.list()?,
    };

    if keys.is_empty() {
        if use_colors {
            println!(
                "{}No fixtures found under {}.{}",
                colors::DIM,
                store.root().display(),
                colors::RESET
            );
        } else {
            println!("No fixtures found under {}.", store.root().display());
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&keys)?;
            println!("{json}");
        }
        OutputFormat::Table => {
            let rows: Vec<(FixtureKey, Option<FixtureRecord>)> = keys
                .into_iter()
                .map(|key| {
                    let record = store
                        .load(&key)
                        .inspect_err(|e| warn!(key = %key, error = %e, "Unreadable fixture"))
                        .ok();
                    (key, record)
                })
                .collect();
            print_fixture_table(&rows, use_colors);
        }
    }

    Ok(())
}

fn print_fixture_table(rows: &[(FixtureKey, Option<FixtureRecord>)], use_colors: bool) {
    use colors::*;

    if use_colors {
        println!(
            "{BOLD}{DIM}  # │ Method │ Status │ Namespace                      │ Action       │ Identifier{RESET}"
        );
        println!(
            "{DIM}────┼────────┼────────┼────────────────────────────────┼──────────────┼─────────────────{RESET}"
        );
    } else {
        println!("  # | Method | Status | Namespace                      | Action       | Identifier");
        println!(
            "----|--------|--------|--------------------------------|--------------|-----------------"
        );
    }

    for (i, (key, record)) in rows.iter().enumerate() {
        let method = record.as_ref().map_or("?", |r| r.method.as_str());
        let status = record
            .as_ref()
            .map_or_else(|| "-".to_string(), |r| r.response.status.to_string());

        if use_colors {
            let status_color = record.as_ref().map_or(RED, |r| get_status_color(r.response.status));
            println!(
                "{DIM}{:>3}{RESET} │ {:<6} │ {status_color}{:>6}{RESET} │ {:<30} │ {:<12} │ {CYAN}{}{RESET}",
                i + 1,
                method,
                status,
                truncate(&key.namespace, 30),
                truncate(&key.action, 12),
                key.identifier
            );
        } else {
            println!(
                "{:>3} | {:<6} | {:>6} | {:<30} | {:<12} | {}",
                i + 1,
                method,
                status,
                truncate(&key.namespace, 30),
                truncate(&key.action, 12),
                key.identifier
            );
        }
    }

    if use_colors {
        println!("\n{DIM}Total: {} fixtures{RESET}", rows.len());
    } else {
        println!("\nTotal: {} fixtures", rows.len());
    }
}

/// Returns the ANSI color for a response status.
fn get_status_color(status: u16) -> &'static str {
    match status {
        200..=299 => colors::GREEN,
        300..=399 => colors::CYAN,
        400..=499 => colors::YELLOW,
        _ => colors::RED,
    }
}

fn show_command(store: &FixtureStore, args: ShowArgs) -> Result<()> {
    let key = FixtureKey::parse(&args.key)?;
    if !store.exists(&key) {
        anyhow::bail!("No fixture at {}", store.path_for(&key).display());
    }

    let record = store.load(&key)?;
    let json = serde_json::to_string_pretty(&record)?;
    println!("{json}");
    Ok(())
}

fn clean_command(store: &FixtureStore, use_colors: bool, args: CleanArgs) -> Result<()> {
    let removed = match args.handler.as_deref() {
        Some(namespace) => store.clean_namespace(namespace)?,
        None => store.clean()?,
    };

    if use_colors {
        println!("{}✓{} Removed {removed} fixtures", colors::GREEN, colors::RESET);
    } else {
        println!("Removed {removed} fixtures");
    }
    Ok(())
}

/// Truncates a string to max length, adding ellipsis if needed.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{kept}…")
    }
}
