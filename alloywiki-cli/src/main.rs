//! # alloywiki CLI
//!
//! Command-line interface for the alloywiki site converter.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "alloywiki")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "alloywiki.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new alloywiki project
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// Build aggregate pages and one page per document
    Build,

    /// Index and transform the corpus without writing, reporting problems
    Check,

    /// Remove spaces and apostrophes from document file names
    NormalizeNames {
        /// Directory to scan
        path: PathBuf,

        /// Print planned renames without touching any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Extract alloy sample properties as JSON
    Properties {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON on stdout stays parseable
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => commands::init_project(path.as_deref()),
        Commands::Build => commands::build_site(&cli.config),
        Commands::Check => commands::check_site(&cli.config),
        Commands::NormalizeNames { path, dry_run } => commands::normalize_names(&path, dry_run),
        Commands::Properties { output, pretty } => {
            commands::export_properties(&cli.config, output.as_deref(), pretty)
        }
    }
}
