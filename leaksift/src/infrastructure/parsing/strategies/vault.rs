// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Vault Extractor
//!
//! Pattern-driven wallet artifact detector, applied to whole-file content.
//! The decision tree runs in strict order and emits nothing when no strong
//! evidence is found - a false vault record is worse than a miss:
//!
//! 1. JSON with `seed_version` or `wallet_type` → Electrum wallet.
//! 2. JSON with `crypto`/`Crypto` or `version` → Ethereum keystore
//!    (MetaMask when the content mentions it); captures address, kdf,
//!    cipher in the clear.
//! 3. `sqlite format 3` / `wallet.dat` substrings → Bitcoin Core.
//! 4. Encrypted-blob regexes over backslash-stripped text → MetaMask
//!    LevelDB fragment. The *last* match wins: LevelDB logs append, so the
//!    final occurrence is the most recent wallet write. Escapes are
//!    stripped for pattern search only; the captured excerpt keeps the
//!    de-escaped form so it parses as JSON.
//!
//! Captured `vault_data` is always bounded to 4 KB.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use leaksift_domain::definitions::{Capability, RecordDefinition};
use leaksift_domain::entities::{truncate_vault_data, RawRecord};
use leaksift_domain::error::SiftError;
use leaksift_domain::services::Extractor;

/// Encrypted-blob shapes seen in MetaMask LevelDB material, in priority
/// order: `{data,iv,salt}`, `{encrypted,nonce,kdf,salt}`, `{ct,iv,s}`.
static BLOB_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?s)\{[^{}]*"data"\s*:\s*".+?"[^{}]*"iv"\s*:\s*".+?"[^{}]*"salt"\s*:\s*".+?"[^{}]*\}"#,
        r#"(?s)\{[^{}]*"encrypted"\s*:\s*".+?"[^{}]*"nonce"\s*:\s*".+?"[^{}]*"kdf"\s*:\s*"(?:pbkdf2|scrypt)"[^{}]*"salt"\s*:\s*".+?"[^{}]*\}"#,
        r#"(?s)\{[^{}]*"ct"\s*:\s*".+?"[^{}]*"iv"\s*:\s*".+?"[^{}]*"s"\s*:\s*".+?"[^{}]*\}"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("builtin blob pattern is valid"))
    .collect()
});

/// Whole-file wallet artifact extractor.
pub struct VaultExtractor;

impl Extractor for VaultExtractor {
    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Vault, Capability::FullFile]
    }

    fn extract(
        &self,
        chunk: &[String],
        _definition: &RecordDefinition,
    ) -> Result<RawRecord, SiftError> {
        let content = chunk.join("\n");
        let content = content.trim();
        let lowered = content.to_lowercase();
        let mut raw = RawRecord::new();

        let parsed: Option<Value> = if content.trim_start().starts_with('{') {
            serde_json::from_str(content).ok()
        } else {
            None
        };
        let object = parsed.as_ref().and_then(Value::as_object);

        // Electrum wallet files carry their schema version in the clear.
        if let Some(obj) = object {
            if obj.contains_key("seed_version") || obj.contains_key("wallet_type") {
                raw.push("vault_type", "electrum");
                raw.push("vault_data", truncate_vault_data(content));
                return Ok(raw);
            }
        }

        // Ethereum keystore JSON (MetaMask exports included).
        if let Some(obj) = object {
            if obj.contains_key("crypto") || obj.contains_key("Crypto") || obj.contains_key("version") {
                let vault_type = if lowered.contains("metamask") {
                    "metamask"
                } else {
                    "ethereum-keystore"
                };
                raw.push("vault_type", vault_type);
                raw.push("vault_data", truncate_vault_data(content));
                if let Some(address) = obj.get("address").and_then(Value::as_str) {
                    raw.push("address", address);
                }
                let crypto = obj.get("crypto").or_else(|| obj.get("Crypto"));
                if let Some(crypto) = crypto.and_then(Value::as_object) {
                    if let Some(kdf) = crypto.get("kdf").and_then(Value::as_str) {
                        raw.push("kdf", kdf);
                    }
                    if let Some(cipher) = crypto.get("cipher").and_then(Value::as_str) {
                        raw.push("cipher", cipher);
                    }
                }
                return Ok(raw);
            }
        }

        // Bitcoin Core wallet.dat, recognizable by its storage header.
        if lowered.contains("sqlite format 3") || lowered.contains("wallet.dat") {
            raw.push("vault_type", "bitcoin");
            raw.push("vault_data", truncate_vault_data(content));
            return Ok(raw);
        }

        // MetaMask fragments inside LevelDB .log/.ldb files arrive with
        // escaped quotes; strip backslashes before searching.
        let de_escaped = content.replace('\\', "");
        let found = BLOB_PATTERNS
            .iter()
            .find_map(|pattern| pattern.find_iter(&de_escaped).last());
        if let Some(found) = found {
            let excerpt = found.as_str();
            raw.push("vault_type", "metamask");
            raw.push("vault_data", truncate_vault_data(excerpt));
            if let Some(blob) = serde_json::from_str::<Value>(excerpt)
                .ok()
                .as_ref()
                .and_then(Value::as_object)
            {
                if let Some(kdf) = blob.get("kdf").and_then(Value::as_str) {
                    raw.push("kdf", kdf);
                }
                if let Some(cipher) = blob.get("cipher").and_then(Value::as_str) {
                    raw.push("cipher", cipher);
                }
            }
            return Ok(raw);
        }

        // No strong evidence; emit nothing rather than false-positive.
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault_definition() -> RecordDefinition {
        serde_json::from_value(serde_json::json!({
            "key": "vault",
            "capabilities": ["vault", "full-file"]
        }))
        .unwrap()
    }

    fn extract(text: &str) -> RawRecord {
        let lines: Vec<String> = text.lines().map(String::from).collect();
        VaultExtractor.extract(&lines, &vault_definition()).unwrap()
    }

    #[test]
    fn test_electrum_detection() {
        let raw = extract(r#"{"seed_version": 18, "wallet_type": "standard"}"#);
        assert_eq!(raw.get("vault_type"), Some("electrum"));
        assert!(raw.get("vault_data").is_some());
    }

    #[test]
    fn test_ethereum_keystore_detection() {
        let raw = extract(
            r#"{"version": 3, "address": "00aa11bb", "crypto": {"kdf": "scrypt", "cipher": "aes-128-ctr", "ciphertext": "dead"}}"#,
        );
        assert_eq!(raw.get("vault_type"), Some("ethereum-keystore"));
        assert_eq!(raw.get("address"), Some("00aa11bb"));
        assert_eq!(raw.get("kdf"), Some("scrypt"));
        assert_eq!(raw.get("cipher"), Some("aes-128-ctr"));
    }

    #[test]
    fn test_metamask_keystore_naming() {
        let raw = extract(r#"{"version": 3, "source": "MetaMask vault backup"}"#);
        assert_eq!(raw.get("vault_type"), Some("metamask"));
    }

    #[test]
    fn test_bitcoin_detection() {
        let raw = extract("binary sludge SQLite format 3 more sludge");
        assert_eq!(raw.get("vault_type"), Some("bitcoin"));
        let raw = extract("backup of wallet.dat follows");
        assert_eq!(raw.get("vault_type"), Some("bitcoin"));
    }

    #[test]
    fn test_leveldb_fragment_last_match_wins() {
        let text = concat!(
            "noise ",
            r#"{\"data\":\"OLD\",\"iv\":\"I1\",\"salt\":\"S1\"}"#,
            " more noise ",
            r#"{\"data\":\"NEW\",\"iv\":\"I2\",\"salt\":\"S2\"}"#,
            " tail"
        );
        let raw = extract(text);
        assert_eq!(raw.get("vault_type"), Some("metamask"));
        let data = raw.get("vault_data").unwrap();
        assert!(data.contains("NEW"), "expected last match, got {data}");
        assert!(!data.contains("OLD"));
    }

    #[test]
    fn test_leveldb_fragment_captures_kdf() {
        let text = r#"x{\"encrypted\":\"AAA\",\"nonce\":\"BBB\",\"kdf\":\"pbkdf2\",\"salt\":\"CCC\"}y"#;
        let raw = extract(text);
        assert_eq!(raw.get("vault_type"), Some("metamask"));
        assert_eq!(raw.get("kdf"), Some("pbkdf2"));
    }

    #[test]
    fn test_no_evidence_emits_nothing() {
        assert!(extract("perfectly ordinary text file").is_empty());
        assert!(extract("x").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_vault_data_is_bounded() {
        let huge_tail = "A".repeat(8000);
        let text = format!(r#"{{"seed_version": 1, "blob": "{huge_tail}"}}"#);
        let raw = extract(&text);
        assert!(raw.get("vault_data").unwrap().len() <= 4096);
    }
}
