// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Strategy Registry and Parser Factory
//!
//! The registry holds the registered implementations of the three strategy
//! interfaces, each bound to its advertised capability set. The factory
//! resolves, per interface, the implementation whose advertisement
//! overlaps most with what a definition requires.
//!
//! ## Selection Rules
//!
//! - Largest intersection between required and advertised capability sets
//!   wins.
//! - Ties break toward the earliest registration. The built-in
//!   registration order in [`StrategyRegistry::with_builtin_strategies`]
//!   is therefore part of the contract.
//! - An interface with zero registered implementations is an error; a
//!   registry without chunkers cannot parse anything.
//!
//! Registries are built once at startup and shared read-only behind `Arc`.

use std::collections::BTreeSet;
use std::sync::Arc;

use leaksift_domain::definitions::{Capability, RecordDefinition};
use leaksift_domain::error::SiftError;
use leaksift_domain::services::{Chunker, Extractor, Transformer};

use super::strategies::{
    AliasGroupingTransformer, DelimitedLineExtractor, FullFileChunker, KvHeaderExtractor,
    LineChunker, RegexSeparatorChunker, VaultExtractor, VaultTransformer,
};

/// The materialized strategy triple for one definition.
#[derive(Clone)]
pub struct ParserParts {
    pub chunker: Arc<dyn Chunker>,
    pub extractor: Arc<dyn Extractor>,
    pub transformer: Arc<dyn Transformer>,
}

impl std::fmt::Debug for ParserParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserParts").finish_non_exhaustive()
    }
}

/// Registered implementations of the three strategy interfaces.
#[derive(Default)]
pub struct StrategyRegistry {
    chunkers: Vec<Arc<dyn Chunker>>,
    extractors: Vec<Arc<dyn Extractor>>,
    transformers: Vec<Arc<dyn Transformer>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with every built-in strategy, in the fixed
    /// order that doubles as the tie-breaker.
    pub fn with_builtin_strategies() -> Self {
        let mut registry = Self::new();
        registry.register_chunker(Arc::new(RegexSeparatorChunker));
        registry.register_chunker(Arc::new(LineChunker));
        registry.register_chunker(Arc::new(FullFileChunker));
        registry.register_extractor(Arc::new(KvHeaderExtractor));
        registry.register_extractor(Arc::new(DelimitedLineExtractor));
        registry.register_extractor(Arc::new(VaultExtractor));
        registry.register_transformer(Arc::new(AliasGroupingTransformer));
        registry.register_transformer(Arc::new(VaultTransformer));
        registry
    }

    pub fn register_chunker(&mut self, chunker: Arc<dyn Chunker>) {
        self.chunkers.push(chunker);
    }

    pub fn register_extractor(&mut self, extractor: Arc<dyn Extractor>) {
        self.extractors.push(extractor);
    }

    pub fn register_transformer(&mut self, transformer: Arc<dyn Transformer>) {
        self.transformers.push(transformer);
    }
}

/// Composes parser parts for definitions by capability overlap.
pub struct ParserFactory {
    registry: Arc<StrategyRegistry>,
}

impl ParserFactory {
    pub fn new(registry: Arc<StrategyRegistry>) -> Self {
        Self { registry }
    }

    /// Pick the best-matching strategy per interface for `definition`.
    ///
    /// # Errors
    ///
    /// Returns `SiftError::InternalError` when any interface has no
    /// registered implementations.
    pub fn build_parts(&self, definition: &RecordDefinition) -> Result<ParserParts, SiftError> {
        let required = definition.capabilities();
        Ok(ParserParts {
            chunker: best_for("chunker", &self.registry.chunkers, &required, |c| {
                c.capabilities()
            })?,
            extractor: best_for("extractor", &self.registry.extractors, &required, |e| {
                e.capabilities()
            })?,
            transformer: best_for("transformer", &self.registry.transformers, &required, |t| {
                t.capabilities()
            })?,
        })
    }
}

/// Largest-overlap selection with first-registration tie-breaking.
fn best_for<T: ?Sized>(
    interface: &str,
    candidates: &[Arc<T>],
    required: &BTreeSet<Capability>,
    advertised: impl Fn(&T) -> &'static [Capability],
) -> Result<Arc<T>, SiftError> {
    let mut best: Option<(usize, &Arc<T>)> = None;
    for candidate in candidates {
        let overlap = advertised(candidate)
            .iter()
            .filter(|cap| required.contains(cap))
            .count();
        let better = match best {
            Some((best_overlap, _)) => overlap > best_overlap,
            None => true,
        };
        if better {
            best = Some((overlap, candidate));
        }
    }
    best.map(|(_, candidate)| Arc::clone(candidate))
        .ok_or_else(|| {
            SiftError::internal_error(format!("no strategies registered for {interface}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(json: serde_json::Value) -> RecordDefinition {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_credential_definition_picks_kv_pipeline() {
        let factory = ParserFactory::new(Arc::new(StrategyRegistry::with_builtin_strategies()));
        let definition = definition(serde_json::json!({
            "key": "credential",
            "record_separators": ["^-+$"],
            "groups": {"auth": ["username"]},
            "fields": [{"name": "username", "header_patterns": ["^user\\s*:"]}]
        }));
        let parts = factory.build_parts(&definition).unwrap();
        assert!(parts.chunker.capabilities().contains(&Capability::RegexBoundary));
        assert!(parts.extractor.capabilities().contains(&Capability::KvHeaders));
        assert!(parts.transformer.capabilities().contains(&Capability::Grouping));
    }

    #[test]
    fn test_vault_definition_picks_full_file_pipeline() {
        let factory = ParserFactory::new(Arc::new(StrategyRegistry::with_builtin_strategies()));
        let definition = definition(serde_json::json!({
            "key": "vault",
            "capabilities": ["vault", "full-file"]
        }));
        let parts = factory.build_parts(&definition).unwrap();
        assert!(parts.chunker.capabilities().contains(&Capability::FullFile));
        assert!(parts.extractor.capabilities().contains(&Capability::Vault));
        assert!(parts.transformer.capabilities().contains(&Capability::Vault));
    }

    #[test]
    fn test_line_based_definition_picks_line_pipeline() {
        let factory = ParserFactory::new(Arc::new(StrategyRegistry::with_builtin_strategies()));
        let definition = definition(serde_json::json!({
            "key": "cookie",
            "multiline": false,
            "capabilities": ["line-based"]
        }));
        let parts = factory.build_parts(&definition).unwrap();
        assert!(parts.chunker.capabilities().contains(&Capability::LineBased));
        assert!(parts.extractor.capabilities().contains(&Capability::LineBased));
    }

    #[test]
    fn test_empty_registry_is_an_error() {
        let factory = ParserFactory::new(Arc::new(StrategyRegistry::new()));
        let definition = definition(serde_json::json!({"key": "anything"}));
        let err = factory.build_parts(&definition).unwrap_err();
        assert!(err.to_string().contains("no strategies registered"));
    }

    #[test]
    fn test_ties_prefer_registration_order() {
        // A definition requiring nothing at all overlaps every chunker by
        // zero; the first registered (RegexSeparatorChunker) must win.
        let factory = ParserFactory::new(Arc::new(StrategyRegistry::with_builtin_strategies()));
        let definition = definition(serde_json::json!({"key": "plain", "multiline": false}));
        let parts = factory.build_parts(&definition).unwrap();
        assert_eq!(
            parts.chunker.capabilities(),
            RegexSeparatorChunker.capabilities()
        );
    }
}
