//! # QuickGenda CLI (`agenda`)
//!
//! Fills a labelled page template once per agenda session and writes the
//! pages to a JSON document, with an optional plain-text report.
//!
//! ## Usage
//!
//! ```bash
//! agenda --config ./config/agenda.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `agenda generate` | Fill one page per session and write the document |
//! | `agenda inspect` | Show CSV fields and template capabilities |
//! | `agenda parse <csv>` | Print parsed sessions as JSON |
//! | `agenda settings default` | Print the default settings JSON |
//! | `agenda settings check <file>` | Validate a settings JSON file |
//!
//! ## Examples
//!
//! ```bash
//! # Generate pages and the report named in the config
//! agenda generate --config ./config/agenda.toml
//!
//! # Check what a template supports before a run
//! agenda inspect --config ./config/agenda.toml
//!
//! # Look at how a CSV is grouped into sessions
//! agenda parse ./data/agenda.csv
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use quickgenda::{config, generate, inspect};
use quickgenda_core::settings::Settings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// QuickGenda CLI: agenda pages from a CSV and a page template.
///
/// Commands that read the run configuration take `--config`. See
/// `config/agenda.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "agenda",
    about = "Fill an agenda page template once per session from a CSV file",
    version,
    long_about = "QuickGenda groups agenda CSV rows into sessions and fills a labelled page \
    template once per session: session fields, chairpersons inline or in a grid with avatar \
    and flag images, and topics as a table or as repeated rows."
)]
struct Cli {
    /// Path to the run configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/agenda.toml")]
    config: PathBuf,

    /// Log at debug level. `RUST_LOG` takes precedence.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill one page per session and write the output document.
    ///
    /// Writes the report too when `[output] report` is set.
    Generate,

    /// Show the CSV summary and what the template supports.
    Inspect,

    /// Parse a CSV file and print its sessions as JSON.
    Parse {
        /// Agenda CSV file.
        csv: PathBuf,
    },

    /// Settings file helpers.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the default settings as JSON.
    Default,

    /// Validate a settings JSON file and print it with defaults filled in.
    Check {
        /// Settings JSON file.
        file: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Commands that don't require config
    match &cli.command {
        Commands::Parse { csv } => {
            let (parsed, _) = generate::read_csv(csv)?;
            println!("{}", serde_json::to_string_pretty(&parsed.sessions)?);
            return Ok(());
        }
        Commands::Settings { action } => {
            match action {
                SettingsAction::Default => {
                    println!("{}", Settings::default().to_json()?);
                }
                SettingsAction::Check { file } => {
                    let content = std::fs::read_to_string(file).with_context(|| {
                        format!("Failed to read settings file: {}", file.display())
                    })?;
                    let settings = Settings::from_json(&content)
                        .with_context(|| format!("Invalid settings file: {}", file.display()))?;
                    println!("{}", settings.to_json()?);
                }
            }
            return Ok(());
        }
        _ => {}
    }

    let cfg = config::load_config(&cli.config)?;
    let settings = config::load_settings(&cfg)?;

    match cli.command {
        Commands::Generate => {
            let summary = generate::run_generate(&cfg, &settings)?;
            generate::print_summary(&summary);
        }
        Commands::Inspect => {
            let report = inspect::inspect(&cfg, &settings)?;
            inspect::print_inspection(&report);
        }
        Commands::Parse { .. } | Commands::Settings { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
