// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! Bootstrap-layer CLI handling for the LeakSift binary.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  1. parse_cli()                     │  Parse CLI with clap
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  2. validate()                      │  Input existence checks
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  3. ValidatedCli                    │  Safe, validated arguments
//! └─────────────────────────────────────┘
//! ```
//!
//! Archive container formats are handled by the application layer; the CLI
//! only checks that every input path exists and is readable as a file or
//! directory.

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use thiserror::Error;

/// CLI parsing and validation errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("input path does not exist: {0}")]
    MissingInput(PathBuf),

    #[error("no input paths given")]
    NoInputs,
}

/// Raw command-line arguments as parsed by clap
#[derive(Debug, Parser)]
#[command(
    name = "leaksift",
    about = "Parse infostealer log archives into a structured dataset",
    version
)]
pub struct Cli {
    /// Archives or log directories to process
    #[arg(value_name = "ARCHIVE", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Also write each parsed leak to a JSON file (one file per input;
    /// multiple inputs get a numeric suffix)
    #[arg(long, value_name = "FILE.json")]
    pub dump_json: Option<PathBuf>,

    /// Parse only; skip the database export
    #[arg(long)]
    pub no_export: bool,

    /// Optional configuration file (TOML) layered under environment variables
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Command-line arguments after validation
///
/// Every input path has been confirmed to exist on disk.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub inputs: Vec<PathBuf>,
    pub dump_json: Option<PathBuf>,
    pub no_export: bool,
    pub config: Option<PathBuf>,
    pub verbose: u8,
}

/// Parse command-line arguments
///
/// Clap handles `--help` and `--version` automatically and exits the
/// process.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Parse and validate CLI arguments
///
/// # Errors
///
/// Returns `CliError` if an input path does not exist.
pub fn parse_and_validate() -> Result<ValidatedCli, CliError> {
    validate_cli(parse_cli())
}

fn validate_cli(cli: Cli) -> Result<ValidatedCli, CliError> {
    if cli.inputs.is_empty() {
        return Err(CliError::NoInputs);
    }
    for input in &cli.inputs {
        if !input.exists() {
            return Err(CliError::MissingInput(input.clone()));
        }
    }
    Ok(ValidatedCli {
        inputs: cli.inputs,
        dump_json: cli.dump_json,
        no_export: cli.no_export,
        config: cli.config,
        verbose: cli.verbose,
    })
}
