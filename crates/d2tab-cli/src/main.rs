//! d2tab CLI
//!
//! Command-line tool for converting Diablo 2 TXT tables to and from
//! the structured TOML format.

use clap::{Parser, Subcommand};
use d2tab_core::{convert_batch, Direction};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "d2tab")]
#[command(about = "Converts Diablo 2 TXT tables to and from TOML", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert TXT files to structured TOML files
    Decompile {
        /// Alternating source and target paths (SOURCE.txt TARGET.toml ...)
        #[arg(required = true, num_args = 2..)]
        paths: Vec<PathBuf>,
    },

    /// Convert structured TOML files back to TXT files
    Compile {
        /// Alternating source and target paths (SOURCE.toml TARGET.txt ...)
        #[arg(required = true, num_args = 2..)]
        paths: Vec<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> d2tab_core::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decompile { paths } => cmd_convert(Direction::Decompile, &paths),
        Commands::Compile { paths } => cmd_convert(Direction::Compile, &paths),
    }
}

fn cmd_convert(direction: Direction, paths: &[PathBuf]) -> d2tab_core::Result<()> {
    let pairs = pair_up(paths);

    let report = convert_batch(direction, &pairs);
    for item in &report.items {
        match &item.outcome {
            Ok(()) => println!("{} -> {}", item.source.display(), item.target.display()),
            Err(e) => eprintln!("{}: {}", item.source.display(), e),
        }
    }

    let failed = report.failed();
    if failed > 0 {
        eprintln!("{} of {} conversion(s) failed", failed, report.items.len());
        std::process::exit(1);
    }

    Ok(())
}

/// Split the flat path list into (source, target) pairs
fn pair_up(paths: &[PathBuf]) -> Vec<(PathBuf, PathBuf)> {
    if paths.len() % 2 != 0 {
        eprintln!(
            "Error: expected an even number of paths (SOURCE TARGET pairs), got {}",
            paths.len()
        );
        std::process::exit(2);
    }
    paths
        .chunks(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}
