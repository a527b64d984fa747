// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Configurable Parser
//!
//! The composition of one record definition with the (chunker, extractor,
//! transformer) triple the factory picked for it. All polymorphism happens
//! through the three strategy interfaces; the parser itself is a dumb
//! pipeline:
//!
//! ```text
//! lines ──chunk──▶ line groups ──extract──▶ raw records ──transform──▶ records
//! ```
//!
//! Empty results are dropped at each stage. When the definition declares
//! `path_extractors`, each named-capture regex runs against the source
//! filename and non-null `browser` / `profile` groups are merged onto the
//! record's top level - filenames like `Cookies/Chrome_Default.txt` often
//! carry more provenance than the file body does.

use leaksift_domain::definitions::RecordDefinition;
use leaksift_domain::entities::ParsedRecord;
use leaksift_domain::error::SiftError;

use super::registry::ParserParts;

/// A parser dynamically configured per record definition.
pub struct ConfigurableParser<'a> {
    definition: &'a RecordDefinition,
    parts: ParserParts,
}

impl<'a> ConfigurableParser<'a> {
    pub fn new(definition: &'a RecordDefinition, parts: ParserParts) -> Self {
        Self { definition, parts }
    }

    pub fn definition(&self) -> &RecordDefinition {
        self.definition
    }

    /// Parse one file's text into canonical records.
    pub fn parse(&self, text: &str, filename: &str) -> Result<Vec<ParsedRecord>, SiftError> {
        let lines: Vec<String> = text.lines().map(String::from).collect();
        let chunks = self.parts.chunker.chunk(&lines, self.definition)?;
        let mut records = Vec::new();
        for chunk in &chunks {
            let raw = self.parts.extractor.extract(chunk, self.definition)?;
            if let Some(mut record) = self.parts.transformer.transform(raw, self.definition)? {
                self.merge_path_extracts(filename, &mut record)?;
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Apply the definition's path extractors to the filename, merging the
    /// `browser` and `profile` captures onto the record.
    fn merge_path_extracts(
        &self,
        filename: &str,
        record: &mut ParsedRecord,
    ) -> Result<(), SiftError> {
        for extractor in &self.definition.patterns()?.path_extractors {
            let Some(captures) = extractor.captures(filename) else {
                continue;
            };
            if let Some(browser) = captures.name("browser") {
                record.browser = Some(browser.as_str().to_string());
            }
            if let Some(profile) = captures.name("profile") {
                record.profile = Some(profile.as_str().to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parsing::registry::{ParserFactory, StrategyRegistry};
    use std::sync::Arc;

    fn build_parser(definition: &RecordDefinition) -> ConfigurableParser<'_> {
        let factory = ParserFactory::new(Arc::new(StrategyRegistry::with_builtin_strategies()));
        let parts = factory.build_parts(definition).unwrap();
        ConfigurableParser::new(definition, parts)
    }

    fn credential_definition() -> RecordDefinition {
        serde_json::from_value(serde_json::json!({
            "key": "credential",
            "record_separators": ["^-{2,}\\s*$", "^$"],
            "groups": {"auth": ["username", "password"]},
            "fields": [
                {"name": "username", "aliases": ["user", "login"], "group": "auth",
                 "header_patterns": ["^(username|user|login)\\s*[:=]"]},
                {"name": "password", "aliases": ["pass", "pwd"], "group": "auth",
                 "header_patterns": ["^(password|pass|pwd)\\s*[:=]"]},
                {"name": "url", "aliases": ["site"],
                 "header_patterns": ["^(url|site)\\s*[:=]"]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_credential_records() {
        let definition = credential_definition();
        let parser = build_parser(&definition);
        let text = "URL: https://example.com\nUsername: alice\nPassword: secret\n\n--\nSite: https://example.org\nLogin: bob\nPass: hunter2";
        let records = parser.parse(text, "VICTIM1/Passwords.txt").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field("username"), Some("alice"));
        assert_eq!(
            records[0].groups.get("auth").and_then(|g| g.get("password")).map(String::as_str),
            Some("secret")
        );
        assert!(records[1].field("url").unwrap().ends_with("example.org"));
    }

    #[test]
    fn test_parse_drops_empty_chunks() {
        let definition = credential_definition();
        let parser = build_parser(&definition);
        let text = "--\n--\n--";
        assert!(parser.parse(text, "x.txt").unwrap().is_empty());
    }

    #[test]
    fn test_path_extractors_merge_browser_and_profile() {
        let definition: RecordDefinition = serde_json::from_value(serde_json::json!({
            "key": "cookie",
            "multiline": false,
            "capabilities": ["line-based"],
            "path_extractors": ["(?P<browser>chrome|brave|edge|firefox)_(?P<profile>[^./]+)"],
            "fields": [
                {"name": "domain"}, {"name": "name"}, {"name": "value"}
            ]
        }))
        .unwrap();
        let parser = build_parser(&definition);
        let records = parser
            .parse(
                "example.com\tTRUE\t/\tFALSE\t0\tsid\tabc",
                "VICTIM1/Cookies/chrome_Default.txt",
            )
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].browser.as_deref(), Some("chrome"));
        assert_eq!(records[0].profile.as_deref(), Some("Default"));
    }
}
