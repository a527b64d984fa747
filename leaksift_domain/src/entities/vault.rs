// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Wallet Vault Artifact
//!
//! A `Vault` is evidence of a cryptocurrency wallet found in a leak: an
//! Electrum wallet file, an Ethereum keystore, a MetaMask LevelDB fragment,
//! or a raw `wallet.dat`. The ciphertext is never decrypted; the record
//! carries a bounded excerpt of the raw material plus whatever metadata the
//! format exposes in the clear (kdf, cipher, address).

use serde::{Deserialize, Serialize};

/// Maximum number of bytes of raw vault material kept on a record.
pub const VAULT_DATA_MAX: usize = 4096;

/// Detected wallet family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VaultType {
    Metamask,
    Bitcoin,
    Electrum,
    EthereumKeystore,
    Generic,
}

impl VaultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VaultType::Metamask => "metamask",
            VaultType::Bitcoin => "bitcoin",
            VaultType::Electrum => "electrum",
            VaultType::EthereumKeystore => "ethereum-keystore",
            VaultType::Generic => "generic",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "metamask" => Some(VaultType::Metamask),
            "bitcoin" => Some(VaultType::Bitcoin),
            "electrum" => Some(VaultType::Electrum),
            "ethereum-keystore" => Some(VaultType::EthereumKeystore),
            "generic" => Some(VaultType::Generic),
            _ => None,
        }
    }
}

impl std::fmt::Display for VaultType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wallet artifact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub vault_type: VaultType,
    pub title: Option<String>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub notes: Option<String>,
    /// Raw JSON or excerpted content, truncated to [`VAULT_DATA_MAX`].
    pub vault_data: Option<String>,
    pub kdf: Option<String>,
    pub cipher: Option<String>,
    pub address: Option<String>,
    pub key_phrase: Option<String>,
    pub seed_words: Option<String>,
    pub browser: String,
    pub profile: String,
    pub filepath: String,
    pub stealer_name: Option<String>,
}

impl Vault {
    pub fn new(vault_type: VaultType, filepath: impl Into<String>) -> Self {
        Self {
            vault_type,
            title: None,
            url: None,
            username: None,
            password: None,
            notes: None,
            vault_data: None,
            kdf: None,
            cipher: None,
            address: None,
            key_phrase: None,
            seed_words: None,
            browser: "unknown".to_string(),
            profile: "unknown".to_string(),
            filepath: filepath.into(),
            stealer_name: None,
        }
    }
}

/// Bound an excerpt to [`VAULT_DATA_MAX`] bytes without splitting a UTF-8
/// code point.
pub fn truncate_vault_data(content: &str) -> String {
    if content.len() <= VAULT_DATA_MAX {
        return content.to_string();
    }
    let mut end = VAULT_DATA_MAX;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    content[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_type_round_trip() {
        for vt in [
            VaultType::Metamask,
            VaultType::Bitcoin,
            VaultType::Electrum,
            VaultType::EthereumKeystore,
            VaultType::Generic,
        ] {
            assert_eq!(VaultType::parse(vt.as_str()), Some(vt));
        }
        assert_eq!(VaultType::parse("dogecoin"), None);
    }

    #[test]
    fn test_truncate_vault_data_bounds() {
        let short = "x".repeat(100);
        assert_eq!(truncate_vault_data(&short), short);

        let long = "y".repeat(VAULT_DATA_MAX + 500);
        let truncated = truncate_vault_data(&long);
        assert_eq!(truncated.len(), VAULT_DATA_MAX);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let long = "é".repeat(VAULT_DATA_MAX); // 2 bytes per char
        let truncated = truncate_vault_data(&long);
        assert!(truncated.len() <= VAULT_DATA_MAX);
        assert!(truncated.chars().all(|c| c == 'é'));
    }
}
