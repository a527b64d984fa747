// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Built-in Chunkers
//!
//! Three ways of bounding records inside a stealer file:
//!
//! - [`RegexSeparatorChunker`] - records separated by marker lines
//!   (`----`, blank lines, banner rows). The accumulated buffer is emitted
//!   at each separator match; the separator line itself is consumed.
//! - [`LineChunker`] - one record per line (cookie jars, URL lists).
//!   Empty lines and `#` comments are skipped.
//! - [`FullFileChunker`] - the whole file is one record (wallet blobs,
//!   LevelDB fragments).

use leaksift_domain::definitions::{Capability, RecordDefinition};
use leaksift_domain::error::SiftError;
use leaksift_domain::services::Chunker;

/// Splits on the definition's `record_separators`, emitting the
/// accumulated buffer at each match.
pub struct RegexSeparatorChunker;

impl Chunker for RegexSeparatorChunker {
    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::RegexBoundary, Capability::Multiline]
    }

    fn chunk(
        &self,
        lines: &[String],
        definition: &RecordDefinition,
    ) -> Result<Vec<Vec<String>>, SiftError> {
        let separators = &definition.patterns()?.separators;
        let mut chunks = Vec::new();
        let mut buffer: Vec<String> = Vec::new();
        for line in lines {
            if !separators.is_empty() && separators.iter().any(|sep| sep.is_match(line)) {
                if !buffer.is_empty() {
                    chunks.push(std::mem::take(&mut buffer));
                }
                continue;
            }
            buffer.push(line.clone());
        }
        if !buffer.is_empty() {
            chunks.push(buffer);
        }
        Ok(chunks)
    }
}

/// Emits each non-empty, non-comment line as its own chunk.
pub struct LineChunker;

impl Chunker for LineChunker {
    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::LineBased]
    }

    fn chunk(
        &self,
        lines: &[String],
        _definition: &RecordDefinition,
    ) -> Result<Vec<Vec<String>>, SiftError> {
        Ok(lines
            .iter()
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| vec![line.clone()])
            .collect())
    }
}

/// Emits the entire file as a single chunk.
pub struct FullFileChunker;

impl Chunker for FullFileChunker {
    fn capabilities(&self) -> &'static [Capability] {
        &[
            Capability::FullFile,
            Capability::Vault,
            Capability::RegexBoundary,
            Capability::Multiline,
        ]
    }

    fn chunk(
        &self,
        lines: &[String],
        _definition: &RecordDefinition,
    ) -> Result<Vec<Vec<String>>, SiftError> {
        if lines.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vec![lines.to_vec()])
        }
    }
}
