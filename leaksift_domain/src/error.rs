// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! This module provides the hierarchical error type for the LeakSift
//! domain. It categorizes failures, carries actionable messages, and
//! supports the sink adapter's retry decision.
//!
//! ## Error Categories
//!
//! #### Definition Errors
//! - **DefinitionLoad**: malformed YAML/JSON or bad regex in a record
//!   definition file. Fatal at startup - definitions are authored
//!   artifacts and silent drops would corrupt the corpus.
//! - **InvalidDefinition**: a structurally valid definition that violates a
//!   semantic constraint (duplicate key, empty field list, ...).
//!
//! #### Processing Errors
//! - **ParseFailed**: a single file could not be parsed. Absorbed by the
//!   leak processor; never aborts a leak.
//! - **ArchiveError**: an archive entry could not be read.
//! - **ValidationError**: a record value failed canonicalization.
//!
//! #### Infrastructure Errors
//! - **IoError**: file system failures.
//! - **DatabaseError**: non-transient sink failures (schema mismatch,
//!   constraint violation). Rolls back the whole-leak transaction.
//! - **ConnectionError**: transient sink failures (connection dropped,
//!   server shutting down). Retried with backoff.
//! - **TimeoutError**: operation timeouts. Also retried.
//!
//! #### System Errors
//! - **SerializationError**: JSON/YAML encoding failures.
//! - **ResourceExhausted**: memory or pool limits.
//! - **Cancelled**: cooperative cancellation. Distinct from errors; the
//!   current leak's transaction rolls back and processing stops.
//! - **InternalError**: unexpected failures.
//!
//! ## Retry Policy
//!
//! The sink adapter retries an export only when `is_transient()` returns
//! true, capped at three attempts with exponential backoff plus jitter.
//! Everything else surfaces immediately.

use thiserror::Error;

/// Domain-specific errors for the stealer-log parsing system.
///
/// Each variant carries a descriptive message. Variants are grouped by
/// category so callers can handle classes of failure systematically
/// rather than matching every variant.
#[derive(Error, Debug, Clone)]
pub enum SiftError {
    #[error("Definition load failed: {0}")]
    DefinitionLoad(String),

    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    #[error("Parse failed: {0}")]
    ParseFailed(String),

    #[error("Archive error: {0}")]
    ArchiveError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl SiftError {
    /// Creates a new definition-load error
    pub fn definition_load(msg: impl Into<String>) -> Self {
        Self::DefinitionLoad(msg.into())
    }

    /// Creates a new parse-failure error
    pub fn parse_failed(msg: impl Into<String>) -> Self {
        Self::ParseFailed(msg.into())
    }

    /// Creates a new archive error
    pub fn archive_error(msg: impl Into<String>) -> Self {
        Self::ArchiveError(msg.into())
    }

    /// Creates a new IO error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::IoError(msg.into())
    }

    /// Creates a new non-transient database error
    pub fn database_error(msg: impl Into<String>) -> Self {
        Self::DatabaseError(msg.into())
    }

    /// Creates a new transient connection error
    pub fn connection_error(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Creates a new internal error
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Checks if the error is transient and worth retrying.
    ///
    /// Drives the sink adapter's retry loop: connection drops, server
    /// shutdowns, and timeouts are retried; schema and constraint failures
    /// are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SiftError::ConnectionError(_) | SiftError::TimeoutError(_) | SiftError::ResourceExhausted(_)
        )
    }

    /// Checks if the error is a cooperative cancellation signal
    pub fn is_cancellation(&self) -> bool {
        matches!(self, SiftError::Cancelled(_))
    }

    /// Gets the error category
    pub fn category(&self) -> &'static str {
        match self {
            SiftError::DefinitionLoad(_) => "definition",
            SiftError::InvalidDefinition(_) => "definition",
            SiftError::ParseFailed(_) => "parsing",
            SiftError::ArchiveError(_) => "archive",
            SiftError::IoError(_) => "io",
            SiftError::DatabaseError(_) => "database",
            SiftError::ConnectionError(_) => "connection",
            SiftError::SerializationError(_) => "serialization",
            SiftError::ValidationError(_) => "validation",
            SiftError::ResourceExhausted(_) => "resource",
            SiftError::TimeoutError(_) => "timeout",
            SiftError::Cancelled(_) => "cancellation",
            SiftError::InternalError(_) => "internal",
        }
    }
}

// Implement conversion from standard library and pattern errors
impl From<std::io::Error> for SiftError {
    fn from(err: std::io::Error) -> Self {
        SiftError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for SiftError {
    fn from(err: serde_json::Error) -> Self {
        SiftError::SerializationError(err.to_string())
    }
}

impl From<regex::Error> for SiftError {
    fn from(err: regex::Error) -> Self {
        SiftError::DefinitionLoad(format!("invalid pattern: {err}"))
    }
}

impl From<globset::Error> for SiftError {
    fn from(err: globset::Error) -> Self {
        SiftError::DefinitionLoad(format!("invalid glob: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(SiftError::connection_error("reset by peer").is_transient());
        assert!(SiftError::TimeoutError("commit".into()).is_transient());
        assert!(!SiftError::database_error("unique violation").is_transient());
        assert!(!SiftError::parse_failed("garbage").is_transient());
    }

    #[test]
    fn test_cancellation_is_not_an_error_category_match() {
        let err = SiftError::Cancelled("operator interrupt".into());
        assert!(err.is_cancellation());
        assert!(!err.is_transient());
        assert_eq!(err.category(), "cancellation");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SiftError = io.into();
        assert_eq!(err.category(), "io");
    }

    #[test]
    fn test_from_bad_regex() {
        let err: SiftError = regex::Regex::new("(").unwrap_err().into();
        assert_eq!(err.category(), "definition");
    }
}
