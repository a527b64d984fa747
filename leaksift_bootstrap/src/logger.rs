// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Logger
//!
//! Tracing initialization for the LeakSift process.
//!
//! ## Design Rationale
//!
//! Logging is wired once, at process start, before any application component
//! runs. The verbosity flag from the CLI maps onto a default `EnvFilter`
//! directive; `RUST_LOG` always wins when set, so operators can scope
//! filtering per module without recompiling.
//!
//! ## Verbosity Mapping
//!
//! - (none) - `info`
//! - `-v`   - `debug`
//! - `-vv`  - `trace`

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `verbosity` is the count of `-v` flags from the CLI. The `RUST_LOG`
/// environment variable overrides the derived default filter.
///
/// Calling this twice is a no-op; the second attempt to set the global
/// subscriber is ignored, which keeps tests that initialize logging
/// independent of ordering.
pub fn init_logging(verbosity: u8) {
    let default_directive = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(0);
        init_logging(2);
        tracing::debug!("logger initialized twice without panicking");
    }
}
