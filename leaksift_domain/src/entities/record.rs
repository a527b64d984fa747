// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Intermediate Record Shapes
//!
//! The parsing pipeline passes two record shapes between its stages:
//!
//! - [`RawRecord`] - what an extractor pulls out of one chunk: an ordered
//!   list of `(raw key, value)` pairs exactly as they appeared in the file.
//!   Keys are the stealer's own labels (`"Soft"`, `"Login"`, `"PWD"`, ...)
//!   before alias resolution.
//! - [`ParsedRecord`] - what a transformer produces: canonical field names
//!   resolved through the definition's alias table, optional field groups,
//!   and the definition key as the record type.
//!
//! First-occurrence order is preserved in `RawRecord` because alias
//! resolution picks the *first* raw key matching a canonical field; stealer
//! dumps frequently repeat labels within one record and the first one wins.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered raw key/value mapping produced by an extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    entries: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw pair, preserving insertion order. Repeated keys are
    /// kept; lookups return the first occurrence.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// First value recorded under `key`, compared case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Iterate pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl FromIterator<(String, String)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Canonical record emitted by a transformer.
///
/// `record_type` is the key of the definition that produced the record
/// (`"credential"`, `"cookie"`, `"system"`, `"vault"`, `"user_file"`, or
/// any custom definition key). `fields` maps canonical field names to
/// cleaned values; `groups` nests the same values under the definition's
/// field groups. `browser` / `profile` are set when a path extractor
/// matched the source filename.
///
/// Maps are `BTreeMap` so that parsing the same archive twice yields
/// byte-identical serialized output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    pub record_type: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub groups: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

impl ParsedRecord {
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            ..Self::default()
        }
    }

    /// Field accessor over the canonical map.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// A record with no fields carries no information and is dropped by
    /// the pipeline.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
