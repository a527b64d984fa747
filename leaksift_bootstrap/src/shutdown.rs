// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Shutdown Coordination
//!
//! Cooperative cancellation for leak processing.
//!
//! ## Design Pattern
//!
//! The coordinator hands out lightweight clone-able tokens. The leak
//! processor checks its token between archive entries, so cancellation is
//! honored at file boundaries: the file currently being parsed may finish,
//! but no further file is started and the in-flight sink transaction rolls
//! back.
//!
//! ## Usage
//!
//! ```rust
//! use leaksift_bootstrap::shutdown::ShutdownCoordinator;
//!
//! let coordinator = ShutdownCoordinator::new();
//! let token = coordinator.token();
//!
//! // worker side
//! if token.is_cancelled() {
//!     // stop between files
//! }
//!
//! // control side
//! coordinator.initiate_shutdown();
//! assert!(token.is_cancelled());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Cancellation token for signaling shutdown
///
/// Lightweight clone-able token that can be passed to async tasks and
/// checked synchronously from CPU-bound parsing loops.
#[derive(Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancellationToken {
    fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Create a token that never fires. Useful for tests and for callers
    /// that do not participate in shutdown.
    pub fn noop() -> Self {
        Self::new()
    }

    /// Cancel this token
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Check if cancelled (non-blocking)
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Wait for cancellation (async)
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        self.notify.notified().await;
    }
}

/// Shutdown coordinator
///
/// Owns the cancellation token and the SIGINT wiring.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    token: CancellationToken,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Get a cancellation token
    ///
    /// Tokens can be cloned and passed to tasks for shutdown signaling.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Check if shutdown has been initiated
    pub fn is_shutting_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Initiate cooperative shutdown
    pub fn initiate_shutdown(&self) {
        if !self.token.is_cancelled() {
            tracing::info!("Initiating cooperative shutdown");
            self.token.cancel();
        }
    }

    /// Spawn a task that trips the coordinator on Ctrl-C.
    ///
    /// Must be called from within a tokio runtime.
    pub fn install_ctrl_c_handler(&self) {
        let coordinator = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                coordinator.initiate_shutdown();
            }
        });
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_starts_uncancelled() {
        let coordinator = ShutdownCoordinator::new();
        assert!(!coordinator.token().is_cancelled());
        assert!(!coordinator.is_shutting_down());
    }

    #[test]
    fn test_cancel_propagates_to_clones() {
        let coordinator = ShutdownCoordinator::new();
        let token = coordinator.token();
        let clone = token.clone();
        coordinator.initiate_shutdown();
        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_future_resolves() {
        let coordinator = ShutdownCoordinator::new();
        let token = coordinator.token();
        coordinator.initiate_shutdown();
        // Already cancelled: must resolve immediately.
        token.cancelled().await;
    }

    #[tokio::test]
    async fn test_waiters_are_notified() {
        let coordinator = ShutdownCoordinator::new();
        let token = coordinator.token();
        let waiter = tokio::spawn(async move { token.cancelled().await });
        tokio::task::yield_now().await;
        coordinator.initiate_shutdown();
        waiter.await.unwrap();
    }
}
