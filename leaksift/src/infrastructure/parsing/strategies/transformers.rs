// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Built-in Transformers
//!
//! - [`AliasGroupingTransformer`] - resolves every raw key to a canonical
//!   field name by case-insensitive match against the field name and its
//!   aliases, populates `fields` and `groups`, and attaches the definition
//!   key as the record type. Values are canonicalized when the field
//!   declares a `data_type`. An empty raw mapping - or one where no field
//!   resolves - produces no record.
//! - [`VaultTransformer`] - passes vault extractor output through,
//!   stamping the record type `vault`.

use leaksift_domain::definitions::{clean_value, Capability, RecordDefinition};
use leaksift_domain::entities::{ParsedRecord, RawRecord};
use leaksift_domain::error::SiftError;
use leaksift_domain::services::Transformer;

/// Alias-resolving, group-populating transformer.
pub struct AliasGroupingTransformer;

impl Transformer for AliasGroupingTransformer {
    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Grouping, Capability::KvHeaders]
    }

    fn transform(
        &self,
        raw: RawRecord,
        definition: &RecordDefinition,
    ) -> Result<Option<ParsedRecord>, SiftError> {
        if raw.is_empty() {
            return Ok(None);
        }
        let mut record = ParsedRecord::new(definition.key.clone());
        for field in &definition.fields {
            let matched = raw.iter().find(|(key, _)| {
                key.eq_ignore_ascii_case(&field.name)
                    || field.aliases.iter().any(|alias| key.eq_ignore_ascii_case(alias))
            });
            let Some((_, value)) = matched else {
                continue;
            };
            let value = match field.data_type {
                Some(data_type) => match clean_value(value, data_type) {
                    Some(cleaned) => cleaned,
                    // Failed type validation: the field is dropped, not the
                    // record.
                    None => continue,
                },
                None => value.to_string(),
            };
            if let Some(group) = &field.group {
                record
                    .groups
                    .entry(group.clone())
                    .or_default()
                    .insert(field.name.clone(), value.clone());
            }
            record.fields.insert(field.name.clone(), value);
        }
        if record.is_empty() {
            return Ok(None);
        }
        Ok(Some(record))
    }
}

/// Pass-through transformer for vault extractor output.
pub struct VaultTransformer;

impl Transformer for VaultTransformer {
    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Vault, Capability::FullFile]
    }

    fn transform(
        &self,
        raw: RawRecord,
        _definition: &RecordDefinition,
    ) -> Result<Option<ParsedRecord>, SiftError> {
        if raw.is_empty() {
            return Ok(None);
        }
        let mut record = ParsedRecord::new("vault");
        for (key, value) in raw.iter() {
            record.fields.insert(key.to_string(), value.to_string());
        }
        Ok(Some(record))
    }
}
