// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # In-Memory Archive
//!
//! Fixture archive holding entries as `(name, bytes)` pairs in insertion
//! order. Backs the integration tests and any caller that already has the
//! decompressed entries in hand.

use leaksift_domain::error::SiftError;
use leaksift_domain::services::{normalize_entry_text, Archive};

/// Archive over in-memory entries.
pub struct MemoryArchive {
    filename: String,
    entries: Vec<(String, Vec<u8>)>,
    closed: bool,
}

impl MemoryArchive {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            entries: Vec::new(),
            closed: false,
        }
    }

    /// Append one entry; insertion order is enumeration order.
    pub fn add(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> &mut Self {
        self.entries.push((name.into(), content.into()));
        self
    }

    /// Builder-style convenience for fixtures.
    pub fn with_entry(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.add(name, content);
        self
    }
}

impl Archive for MemoryArchive {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn entries(&self) -> Vec<String> {
        if self.closed {
            return Vec::new();
        }
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    fn read(&self, path: &str) -> Result<String, SiftError> {
        if self.closed {
            return Err(SiftError::archive_error("archive is closed"));
        }
        self.entries
            .iter()
            .find(|(name, _)| name == path)
            .map(|(_, bytes)| normalize_entry_text(bytes))
            .ok_or_else(|| SiftError::archive_error(format!("no such entry: {path}")))
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
