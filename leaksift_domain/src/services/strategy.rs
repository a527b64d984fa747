// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Parsing Strategy Seams
//!
//! This module defines the three trait interfaces that every configurable
//! parser composes, whether built-in or user-supplied:
//!
//! - **Chunker**: splits a file's lines into record-sized line groups.
//! - **Extractor**: pulls a raw key/value mapping out of one line group.
//! - **Transformer**: resolves raw keys into canonical fields and emits the
//!   final record, or nothing when the chunk carried no information.
//!
//! ## Capability Matching
//!
//! Each implementation advertises a static capability set. The parser
//! factory picks, per interface, the implementation whose advertisement has
//! the largest overlap with the capability set a definition requires. Ties
//! break toward the earliest registration, so the built-in registration
//! order is part of the contract.
//!
//! ## Why Three Seams?
//!
//! Stealer formats vary along exactly these axes: how records are bounded
//! (separator lines, one-per-line, whole-file blobs), how values are
//! encoded (header/value pairs, fixed-position columns, embedded JSON), and
//! how raw labels map to semantic fields. Keeping the axes independent
//! means a new file family is usually just a new definition, not new code.
//!
//! All three interfaces are synchronous: parsing is CPU-bound regex work
//! and runs on one logical thread per leak.

use crate::definitions::{Capability, RecordDefinition};
use crate::entities::{ParsedRecord, RawRecord};
use crate::error::SiftError;

/// Splits file lines into record-sized chunks.
pub trait Chunker: Send + Sync {
    /// Capability tags this chunker advertises.
    fn capabilities(&self) -> &'static [Capability];

    /// Group `lines` into chunks according to the definition.
    fn chunk(
        &self,
        lines: &[String],
        definition: &RecordDefinition,
    ) -> Result<Vec<Vec<String>>, SiftError>;
}

/// Extracts a raw key/value mapping from one chunk.
pub trait Extractor: Send + Sync {
    fn capabilities(&self) -> &'static [Capability];

    /// Produce the raw mapping for `chunk`. An empty mapping means the
    /// chunk carried nothing extractable and is dropped downstream.
    fn extract(
        &self,
        chunk: &[String],
        definition: &RecordDefinition,
    ) -> Result<RawRecord, SiftError>;
}

/// Transforms a raw mapping into a canonical record.
pub trait Transformer: Send + Sync {
    fn capabilities(&self) -> &'static [Capability];

    /// Resolve raw keys to canonical field names. `None` drops the record.
    fn transform(
        &self,
        raw: RawRecord,
        definition: &RecordDefinition,
    ) -> Result<Option<ParsedRecord>, SiftError>;
}
