// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Built-in Extractors
//!
//! - [`KvHeaderExtractor`] - walks a chunk line by line; on lines matching
//!   any of the definition's header patterns, splits at the first
//!   key-value delimiter and records `(key, trimmed value)`. First
//!   occurrence order is preserved for downstream alias resolution.
//! - [`DelimitedLineExtractor`] - the seven-field Netscape cookie decoder:
//!   exact tab split first, whitespace-run split capped at seven pieces as
//!   the fallback. Anything else yields an empty mapping.

use leaksift_domain::definitions::{Capability, RecordDefinition};
use leaksift_domain::entities::{split_cookie_line, RawRecord};
use leaksift_domain::error::SiftError;
use leaksift_domain::services::Extractor;

/// Canonical raw keys produced by the cookie decoder, in field order.
const COOKIE_KEYS: [&str; 7] = [
    "domain",
    "domain_specified",
    "path",
    "secure",
    "expiry",
    "name",
    "value",
];

/// Header-driven key/value extractor.
pub struct KvHeaderExtractor;

impl Extractor for KvHeaderExtractor {
    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::KvHeaders]
    }

    fn extract(
        &self,
        chunk: &[String],
        definition: &RecordDefinition,
    ) -> Result<RawRecord, SiftError> {
        let compiled = definition.patterns()?;
        let mut raw = RawRecord::new();
        for line in chunk {
            if !compiled.headers.iter().any(|header| header.is_match(line)) {
                continue;
            }
            // First delimiter (in definition order) that occurs on the line
            // splits it; everything before is the key, everything after the
            // value.
            for delimiter in &compiled.delimiters {
                if let Some(found) = delimiter.find(line) {
                    let key = line[..found.start()].trim();
                    let value = line[found.end()..].trim();
                    if !key.is_empty() {
                        raw.push(key, value);
                    }
                    break;
                }
            }
        }
        Ok(raw)
    }
}

/// Seven-field cookie line decoder.
pub struct DelimitedLineExtractor;

impl Extractor for DelimitedLineExtractor {
    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::LineBased]
    }

    fn extract(
        &self,
        chunk: &[String],
        _definition: &RecordDefinition,
    ) -> Result<RawRecord, SiftError> {
        let mut raw = RawRecord::new();
        let Some(line) = chunk.first() else {
            return Ok(raw);
        };
        if let Some(fields) = split_cookie_line(line) {
            for (key, value) in COOKIE_KEYS.iter().zip(fields.iter()) {
                raw.push(*key, *value);
            }
        }
        Ok(raw)
    }
}
