// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # LeakSift Bootstrap
//!
//! Process-edge concerns for the LeakSift binary: command-line parsing,
//! logging initialization, and cooperative shutdown.
//!
//! ## Key Design Principles
//!
//! 1. **Separation from Enterprise Layers**
//!    - Bootstrap can access all layers
//!    - Enterprise layers cannot access bootstrap
//!    - Clear architectural boundary
//!
//! 2. **Graceful Shutdown**
//!    - SIGINT handler trips a shared cancellation token
//!    - The leak processor honors it between files
//!    - In-flight sink transactions roll back
//!
//! 3. **Testability**
//!    - Validation split from clap parsing
//!    - No-op cancellation tokens for tests
//!
//! ## Module Structure
//!
//! - `cli` - Argument parsing and validation
//! - `logger` - Tracing subscriber initialization
//! - `shutdown` - Cancellation token and SIGINT wiring

pub mod cli;
pub mod logger;
pub mod shutdown;

pub use cli::{parse_and_validate, CliError, ValidatedCli};
pub use logger::init_logging;
pub use shutdown::{CancellationToken, ShutdownCoordinator};

/// Bootstrap CLI parsing.
///
/// Parses and validates command-line arguments. Clap handles `--help` and
/// `--version` automatically and exits the process.
///
/// # Errors
///
/// Returns `CliError` if validation fails; the caller maps it to an exit
/// code.
pub fn bootstrap_cli() -> Result<ValidatedCli, CliError> {
    cli::parse_and_validate()
}
