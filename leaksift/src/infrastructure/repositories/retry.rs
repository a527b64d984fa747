// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Transient-Error Retry
//!
//! Retry wrapper for sink operations. Only errors classified transient by
//! [`SiftError::is_transient`] are retried; everything else - including
//! cancellation - propagates on the first attempt.
//!
//! Backoff: `0.5 * 2^n` seconds for attempt `n` (0-based), plus uniform
//! jitter of at most a quarter of the delay, capped at three attempts
//! total. The budget is deliberately small: a leak export holds a
//! transaction open, and a sink that is down for minutes should fail the
//! leak rather than pin workers.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use leaksift_domain::error::SiftError;

/// Maximum attempts, first try included.
pub const MAX_ATTEMPTS: u32 = 3;

/// Run `operation`, retrying transient failures with backoff + jitter.
pub async fn with_retry<T, F, Fut>(operation_name: &str, mut operation: F) -> Result<T, SiftError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SiftError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt + 1 < MAX_ATTEMPTS => {
                let delay = backoff_delay(attempt);
                warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient sink error, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// `0.5 * 2^n` seconds plus jitter in `[0, 0.25 * delay]`.
fn backoff_delay(attempt: u32) -> Duration {
    let base = 0.5 * 2f64.powi(attempt as i32);
    let jitter = rand::rng().random_range(0.0..=base * 0.25);
    Duration::from_secs_f64(base + jitter)
}
