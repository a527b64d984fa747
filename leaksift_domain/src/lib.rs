// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # LeakSift Domain
//!
//! Pure domain layer for the LeakSift stealer-log parsing engine. This crate
//! holds everything that is true about the problem regardless of runtime,
//! storage, or transport:
//!
//! - **Entities**: Leak, System, Credential, Cookie, Vault, UserFile, and
//!   the intermediate record shapes the parsing pipeline passes around.
//! - **Record definitions**: the declarative description of a stealer file
//!   family (globs, separators, field aliases, score weights) with memoized
//!   pattern compilation.
//! - **Strategy seams**: the Chunker / Extractor / Transformer traits that
//!   the parsing pipeline composes, each advertising a capability set.
//! - **Selector**: the definition-match scorer that picks a parser for a
//!   sampled file.
//! - **Ports**: the `Archive` and `LeakSink` traits the infrastructure
//!   layer implements.
//!
//! ## Layering
//!
//! The domain depends on `regex`, `globset`, and `serde` only. No tokio, no
//! database driver, no logging. Infrastructure ports that involve I/O
//! (`LeakSink`) are async traits; all parsing logic is synchronous and
//! CPU-bound by design.

pub mod definitions;
pub mod entities;
pub mod error;
pub mod services;

// Re-export commonly used types
pub use definitions::{Capability, DataType, FieldDef, RecordDefinition, ScoreWeights};
pub use entities::{
    Cookie, Credential, Leak, ParsedRecord, RawRecord, System, SystemData, UserFile, Vault,
    VaultType,
};
pub use error::SiftError;
pub use services::{
    score_definition, Archive, Chunker, ExportStats, Extractor, LeakSink, Transformer,
};
