// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Sink Port
//!
//! Outbound contract for persisting a parsed leak. One operation, atomic:
//! either the sink ends up holding the whole leak (one leak row, one row
//! per system, bulk-inserted children, updated `systems_count`) or none of
//! it. Readers of the sink never observe a partial leak.
//!
//! Transient failures (connection dropped, server shutting down) are the
//! implementation's business to retry; only errors that survive the retry
//! budget - or were never retryable - surface to the caller, and they are
//! the only errors that terminate a leak.

use async_trait::async_trait;
use serde::Serialize;

use crate::entities::Leak;
use crate::error::SiftError;

/// Row counts written by one successful export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportStats {
    pub systems: u64,
    pub credentials: u64,
    pub cookies: u64,
    pub vaults: u64,
    pub user_files: u64,
}

/// Transactional bulk writer for parsed leaks.
#[async_trait]
pub trait LeakSink: Send + Sync {
    /// Persist the leak atomically and return the written row counts.
    async fn export_leak(&self, leak: &Leak) -> Result<ExportStats, SiftError>;
}
