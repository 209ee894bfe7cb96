//! xkernel CLI
//!
//! Validate executions, compute content addresses, and build or verify
//! receipts from JSON files.
//!
//! Results go to stdout as canonical JSON (or a bare id) followed by a
//! newline. Diagnostics and logs go to stderr.

mod load;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use xkernel::core::canonical_json_bytes;
use xkernel::{Execution, Kernel, KernelConfig, Value, Verdict};

use crate::load::load_json;

#[derive(Parser)]
#[command(name = "xkernel")]
#[command(about = "Execution validation and tamper-evident receipts", long_about = None)]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Require wrapped executions to carry the expected spec and version tags
    #[arg(long, global = true)]
    strict_envelope: bool,

    /// Reject bare executions without the `execution` wrapper
    #[arg(long, global = true)]
    wrapped_only: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an execution (unit-step admissibility and replay match)
    Validate {
        /// Execution JSON file
        execution: PathBuf,
    },
    /// Print the execution content address (xk:sha256:...)
    Hash {
        /// Execution JSON file
        execution: PathBuf,
    },
    /// Emit the receipt JSON for an execution
    Receipt {
        /// Execution JSON file
        execution: PathBuf,
        /// Target state JSON file for the closure check
        #[arg(long)]
        target: Option<PathBuf>,
    },
    /// Verify a receipt against an execution
    Verify {
        /// Receipt JSON file
        receipt: PathBuf,
        /// Execution JSON file
        execution: PathBuf,
    },
    /// Print the receipt content address (xr:sha256:...)
    ReceiptHash {
        /// Receipt JSON file
        receipt: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let kernel = Kernel::new(KernelConfig {
        accept_bare_execution: !cli.wrapped_only,
        require_envelope_tags: cli.strict_envelope,
    });
    debug!(config = ?kernel.config(), "starting");

    match cli.command {
        Commands::Validate { execution } => {
            let execution = load_execution(&kernel, &execution)?;
            emit_verdict(&kernel.validate(&execution))
        }
        Commands::Hash { execution } => {
            let execution = load_execution(&kernel, &execution)?;
            emit_line(kernel.hash(&execution).to_string().as_bytes())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Receipt { execution, target } => {
            let execution = load_execution(&kernel, &execution)?;
            let target = match target {
                Some(path) => Some(kernel.load_target(&load_json(&path)?)?),
                None => None,
            };
            let receipt = kernel.receipt(&execution, target.as_ref());
            emit_line(&canonical_json_bytes(&receipt.to_value()))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Verify { receipt, execution } => {
            let receipt = load_receipt(&kernel, &receipt)?;
            let execution = load_execution(&kernel, &execution)?;
            emit_verdict(&kernel.verify(&receipt, &execution))
        }
        Commands::ReceiptHash { receipt } => {
            let receipt = load_receipt(&kernel, &receipt)?;
            emit_line(kernel.receipt_hash(&receipt).to_string().as_bytes())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_execution(kernel: &Kernel, path: &Path) -> Result<Execution> {
    Ok(kernel.load_execution(&load_json(path)?)?)
}

fn load_receipt(kernel: &Kernel, path: &Path) -> Result<Value> {
    Ok(kernel.load_receipt(&load_json(path)?)?)
}

/// Print a verdict; the exit status mirrors `ok`.
fn emit_verdict(verdict: &Verdict) -> Result<ExitCode> {
    emit_line(&canonical_json_bytes(&verdict.to_value()))?;
    Ok(if verdict.ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn emit_line(bytes: &[u8]) -> Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(bytes)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
