//! inilink CLI — check and reformat configuration files against a schema.
//!
//! Provides `inilink check` for validating a configuration file against a
//! TOML schema description, and `inilink fmt` for printing the re-serialized
//! document (optionally with default values substituted).

#![warn(missing_docs)]

mod check;
mod schema_file;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// inilink — a schema-validated configuration-file engine.
#[derive(Parser, Debug)]
#[command(name = "inilink", version, about = "inilink configuration toolkit")]
pub struct Cli {
    /// Suppress all output except diagnostics.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a configuration file against a schema.
    Check(CheckArgs),
    /// Parse a configuration file and print its canonical serialization.
    Fmt(FmtArgs),
}

/// Arguments for the `inilink check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the configuration file to validate.
    pub config: String,

    /// Path to a TOML schema description. Without one, an empty schema is
    /// used and every identifier is unregistered.
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Treat unregistered sections and options as errors.
    #[arg(long)]
    pub strict: bool,

    /// Stop at the first error instead of collecting all of them.
    #[arg(long)]
    pub fail_fast: bool,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `inilink fmt` subcommand.
#[derive(Parser, Debug)]
pub struct FmtArgs {
    /// Path to the configuration file to reformat.
    pub config: String,

    /// Path to a TOML schema description.
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Treat unregistered sections and options as errors.
    #[arg(long)]
    pub strict: bool,

    /// Render each option's default values instead of the loaded ones.
    #[arg(long)]
    pub defaults: bool,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-diagnostic output.
    pub quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    let global = GlobalArgs { quiet: cli.quiet };

    let result = match cli.command {
        Command::Check(ref args) => check::run_check(args, &global),
        Command::Fmt(ref args) => check::run_fmt(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
