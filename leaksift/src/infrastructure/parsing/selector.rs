// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Parser Selector
//!
//! Picks a parser for one archive entry. Selection must be cheap - it runs
//! for every entry across tens of thousands - so it looks at a bounded
//! sample: the first 12 KB of text, at most 200 lines.
//!
//! ## Selection Order
//!
//! 1. When definition parsers are preferred and any definitions are
//!    loaded, every definition is scored against the sample; the highest
//!    score at or above the threshold wins and a configurable parser is
//!    composed for it.
//! 2. Otherwise the legacy filename-substring heuristic picks one of the
//!    three fixed parsers.
//! 3. Otherwise the file is skipped - archives are full of screenshots,
//!    binaries, and chaff, and that is expected.

use leaksift_domain::definitions::RecordDefinition;
use leaksift_domain::entities::ParsedRecord;
use leaksift_domain::error::SiftError;
use leaksift_domain::services::best_match;

use super::configurable::ConfigurableParser;
use super::legacy::LegacyParser;
use super::registry::ParserFactory;
use super::store::DefinitionStore;

/// Sample budget for selection: bytes first, then a line cap.
pub const SAMPLE_BYTES: usize = 12 * 1024;
pub const SAMPLE_LINES: usize = 200;

/// The parser chosen for one file.
pub enum SelectedParser<'a> {
    Definition(ConfigurableParser<'a>),
    Legacy(LegacyParser),
}

impl SelectedParser<'_> {
    /// Parser name for diagnostics (`(path, parser)` log fields).
    pub fn name(&self) -> String {
        match self {
            SelectedParser::Definition(parser) => {
                format!("ConfigurableParser({})", parser.definition().key)
            }
            SelectedParser::Legacy(parser) => parser.name().to_string(),
        }
    }

    /// Parse one file's text into canonical records.
    pub fn parse(&self, text: &str, filename: &str) -> Result<Vec<ParsedRecord>, SiftError> {
        match self {
            SelectedParser::Definition(parser) => parser.parse(text, filename),
            SelectedParser::Legacy(parser) => Ok(parser.parse(text)),
        }
    }
}

/// Scores definitions against sampled file prefixes and falls back to the
/// legacy heuristic.
pub struct ParserSelector {
    definitions: Vec<RecordDefinition>,
    factory: ParserFactory,
    threshold: f64,
    prefer_definitions: bool,
}

impl ParserSelector {
    pub fn new(
        store: DefinitionStore,
        factory: ParserFactory,
        threshold: f64,
        prefer_definitions: bool,
    ) -> Self {
        Self {
            definitions: store.into_definitions(),
            factory,
            threshold,
            prefer_definitions,
        }
    }

    /// Bound a file's text to the selection sample.
    pub fn sample(text: &str) -> &str {
        if text.len() <= SAMPLE_BYTES {
            return text;
        }
        let mut end = SAMPLE_BYTES;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        &text[..end]
    }

    /// Choose a parser for `path`, or `None` to skip the file.
    pub fn select(
        &self,
        path: &str,
        sample_text: &str,
    ) -> Result<Option<SelectedParser<'_>>, SiftError> {
        if self.prefer_definitions && !self.definitions.is_empty() {
            let lines: Vec<&str> = sample_text.lines().take(SAMPLE_LINES).collect();
            if let Some((definition, _score)) =
                best_match(path, &lines, &self.definitions, self.threshold)?
            {
                let parts = self.factory.build_parts(definition)?;
                return Ok(Some(SelectedParser::Definition(ConfigurableParser::new(
                    definition, parts,
                ))));
            }
        }
        Ok(LegacyParser::for_path(path).map(SelectedParser::Legacy))
    }
}
