//! # boost CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use boost_cli::dictionary::{run_dictionary, DictionaryArgs};
use boost_cli::entities::run_entities;
use boost_cli::validate::{run_validate, ValidateArgs};

/// BOOST schema repository tool.
///
/// Lists entities, validates payload files and prints field dictionaries
/// straight from a schema repository on disk.
#[derive(Parser, Debug)]
#[command(name = "boost", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Schema repository root. Defaults to the first existing of
    /// /app/schema, ../schema and ./schema.
    #[arg(long, global = true, value_name = "DIR")]
    schema_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every entity that has a schema.
    Entities,

    /// Validate a JSON payload file against an entity schema.
    Validate(ValidateArgs),

    /// Print the field dictionary of an entity.
    Dictionary(DictionaryArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = boost_cli::schema_root(cli.schema_root.as_deref()).and_then(|root| {
        tracing::debug!(schema_root = %root.display(), "resolved schema root");
        let mut out = std::io::stdout().lock();
        match &cli.command {
            Commands::Entities => run_entities(&root, &mut out),
            Commands::Validate(args) => run_validate(args, &root, &mut out),
            Commands::Dictionary(args) => run_dictionary(args, &root, &mut out),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
