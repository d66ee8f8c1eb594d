//! Rill command-line interface
//!
//! Runs Rill programs and dumps parsed ASTs. Faults go to stderr with the
//! byte offset and the remaining program text, and exit with status 1.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rill_runtime::Rill;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "rill", version, about = "Rill language interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Rill program
    Run {
        /// Path to the source file
        file: PathBuf,
        /// Report faults as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Parse a Rill program and dump its AST as JSON
    Ast {
        /// Path to the source file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, json } => run_file(&file, json),
        Commands::Ast { file } => dump_ast(&file),
    }
}

fn run_file(path: &Path, json: bool) -> Result<()> {
    let source = read_source(path)?;

    let mut runtime = Rill::new();
    let outcome = runtime.run(&source);

    // Output produced before a fault is still printed
    print!("{}", outcome.output);
    std::io::stdout().flush()?;

    if let Err(fault) = outcome.result {
        if json {
            eprintln!("{}", serde_json::to_string_pretty(&fault)?);
        } else {
            eprintln!("{}", fault.report(&source));
        }
        process::exit(1);
    }

    Ok(())
}

fn dump_ast(path: &Path) -> Result<()> {
    let source = read_source(path)?;

    match Rill::parse(&source) {
        Ok(program) => {
            println!("{}", serde_json::to_string_pretty(&program)?);
            Ok(())
        }
        Err(fault) => {
            eprintln!("{}", fault.report(&source));
            process::exit(1);
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
