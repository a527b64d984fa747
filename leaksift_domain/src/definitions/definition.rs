// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Record Definitions
//!
//! A `RecordDefinition` describes one stealer file family declaratively:
//! which filenames it tends to use, how records are separated, which
//! key-value delimiters appear, and every alias the semantic fields go by
//! across stealer builds. Definitions are authored as YAML or JSON files
//! and loaded once at startup; after that they are frozen values shared
//! behind `Arc`.
//!
//! ## Pattern Compilation
//!
//! The regex arrays (`headers`, `separators`, `aliases`, `delims`,
//! `path_extractors`) and the glob set are compiled at most once per
//! definition, on first access, and memoized in a `OnceCell`. The
//! definition store forces compilation at load time so a bad pattern is a
//! startup error carrying the offending definition key, never a runtime
//! surprise.
//!
//! ## Capabilities
//!
//! Each definition derives a capability tag set that the parser factory
//! matches against strategy advertisements:
//!
//! - `regex-boundary` - `record_separators` non-empty
//! - `kv-headers` - any field has `header_patterns`
//! - `multiline` - the `multiline` flag
//! - `grouping` - `groups` non-empty
//!
//! `full-file`, `line-based`, and `vault` may be declared explicitly via
//! the optional `capabilities` list.

use globset::{Glob, GlobSet, GlobSetBuilder};
use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::SiftError;

/// Capability tags advertised by strategies and required by definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    RegexBoundary,
    KvHeaders,
    Multiline,
    Grouping,
    FullFile,
    LineBased,
    Vault,
}

/// Declared data type of a field value, driving canonicalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Integer,
    Boolean,
}

/// One semantic field of a record family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub header_patterns: Vec<String>,
    #[serde(default)]
    pub value_patterns: Vec<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub order_hint: Option<i32>,
    /// When declared, the transformer canonicalizes and validates the
    /// extracted value; undeclared fields pass through as-is.
    #[serde(default)]
    pub data_type: Option<DataType>,
}

/// Selector score weights; see the matcher for the scoring formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_header_weight")]
    pub header: f64,
    #[serde(default = "default_separator_weight")]
    pub separator: f64,
    #[serde(default = "default_alias_weight")]
    pub alias: f64,
    #[serde(default = "default_path_weight")]
    pub path: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            header: default_header_weight(),
            separator: default_separator_weight(),
            alias: default_alias_weight(),
            path: default_path_weight(),
        }
    }
}

fn default_header_weight() -> f64 {
    2.0
}
fn default_separator_weight() -> f64 {
    1.0
}
fn default_alias_weight() -> f64 {
    0.5
}
fn default_path_weight() -> f64 {
    1.0
}

fn default_kv_delimiters() -> Vec<String> {
    vec![":".to_string(), "=".to_string()]
}

fn default_multiline() -> bool {
    true
}

/// Declarative description of one stealer file family.
///
/// Immutable after load. Cloning is cheap relative to load frequency and
/// carries the memoized pattern cache along.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordDefinition {
    pub key: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_globs: Vec<String>,
    #[serde(default)]
    pub record_separators: Vec<String>,
    #[serde(default = "default_kv_delimiters")]
    pub kv_delimiters: Vec<String>,
    #[serde(default = "default_multiline")]
    pub multiline: bool,
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    /// Named-capture regexes applied to the source filename; groups named
    /// `browser` and `profile` are merged onto each record.
    #[serde(default)]
    pub path_extractors: Vec<String>,
    /// Explicitly declared capabilities, unioned with the derived ones.
    #[serde(default, rename = "capabilities")]
    pub declared_capabilities: Vec<Capability>,
    #[serde(default)]
    pub score_weights: ScoreWeights,
    #[serde(skip)]
    compiled: OnceCell<CompiledDefinition>,
}

/// Compiled pattern sets for one definition.
#[derive(Debug, Clone)]
pub struct CompiledDefinition {
    pub headers: Vec<Regex>,
    pub separators: Vec<Regex>,
    pub aliases: Vec<Regex>,
    pub delimiters: Vec<Regex>,
    pub path_extractors: Vec<Regex>,
    pub globs: GlobSet,
}

impl CompiledDefinition {
    fn compile(definition: &RecordDefinition) -> Result<Self, SiftError> {
        let context = |err: SiftError| {
            SiftError::DefinitionLoad(format!("definition '{}': {}", definition.key, err))
        };

        let mut headers = Vec::new();
        for field in &definition.fields {
            for pattern in &field.header_patterns {
                headers.push(compile_insensitive(pattern).map_err(context)?);
            }
        }

        let mut separators = Vec::new();
        for pattern in &definition.record_separators {
            separators.push(compile_insensitive(pattern).map_err(context)?);
        }

        let mut aliases = Vec::new();
        for field in &definition.fields {
            for alias in &field.aliases {
                aliases.push(compile_insensitive(&regex::escape(alias)).map_err(context)?);
            }
        }

        let mut delimiters = Vec::new();
        for delimiter in &definition.kv_delimiters {
            let pattern = format!(r"\s*{}\s*", regex::escape(delimiter));
            delimiters.push(Regex::new(&pattern).map_err(|e| context(e.into()))?);
        }

        let mut path_extractors = Vec::new();
        for pattern in &definition.path_extractors {
            path_extractors.push(compile_insensitive(pattern).map_err(context)?);
        }

        let mut glob_builder = GlobSetBuilder::new();
        for glob in &definition.file_globs {
            glob_builder.add(Glob::new(glob).map_err(|e| context(e.into()))?);
        }
        let globs = glob_builder.build().map_err(|e| context(e.into()))?;

        Ok(Self {
            headers,
            separators,
            aliases,
            delimiters,
            path_extractors,
            globs,
        })
    }
}

fn compile_insensitive(pattern: &str) -> Result<Regex, SiftError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(SiftError::from)
}

impl RecordDefinition {
    /// Access the compiled pattern sets, compiling on first call.
    ///
    /// The definition store calls this at load time so any pattern error
    /// surfaces as a startup failure.
    pub fn patterns(&self) -> Result<&CompiledDefinition, SiftError> {
        self.compiled
            .get_or_try_init(|| CompiledDefinition::compile(self))
    }

    /// Capability tags derived from the definition's shape, unioned with
    /// explicitly declared ones.
    pub fn capabilities(&self) -> BTreeSet<Capability> {
        let mut caps: BTreeSet<Capability> = self.declared_capabilities.iter().copied().collect();
        if !self.record_separators.is_empty() {
            caps.insert(Capability::RegexBoundary);
        }
        if self.fields.iter().any(|f| !f.header_patterns.is_empty()) {
            caps.insert(Capability::KvHeaders);
        }
        if self.multiline {
            caps.insert(Capability::Multiline);
        }
        if !self.groups.is_empty() {
            caps.insert(Capability::Grouping);
        }
        caps
    }

    /// Look up a field definition by canonical name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Clean and validate one extracted value against its declared data type.
///
/// Applied by the transformer whenever a field declares a `data_type`:
/// whitespace is trimmed, one layer of matching surrounding quotes is
/// stripped, trailing `,;.` punctuation is removed, typed values are
/// validated, and anything longer than 255 characters is cut to 240 and
/// suffixed with `~DATA_TRUNCATED`.
///
/// Returns `None` when the value fails type validation.
pub fn clean_value(value: &str, data_type: DataType) -> Option<String> {
    const MAX_LEN: usize = 255;
    const TRUNCATION_SUFFIX: &str = "~DATA_TRUNCATED";

    let mut cleaned = value.trim();

    // One layer of matching surrounding quotes.
    for quote in ['"', '\''] {
        if cleaned.len() >= 2 && cleaned.starts_with(quote) && cleaned.ends_with(quote) {
            cleaned = &cleaned[1..cleaned.len() - 1];
            break;
        }
    }

    let cleaned = cleaned.trim_end_matches([',', ';', '.']);

    match data_type {
        DataType::Integer => {
            cleaned.parse::<i64>().ok()?;
        }
        DataType::Boolean => {
            let lowered = cleaned.to_ascii_lowercase();
            if !matches!(lowered.as_str(), "true" | "false" | "yes" | "no" | "1" | "0") {
                return None;
            }
        }
        DataType::String => {}
    }

    if cleaned.chars().count() > MAX_LEN {
        let kept: String = cleaned.chars().take(MAX_LEN - TRUNCATION_SUFFIX.len()).collect();
        return Some(format!("{kept}{TRUNCATION_SUFFIX}"));
    }
    Some(cleaned.to_string())
}
