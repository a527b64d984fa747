// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Leak Processor
//!
//! Orchestrates one archive into one `Leak`: walks entries, selects a
//! parser per file, classifies the resulting records, and aggregates them
//! under per-system identities keyed by the top-level path component.
//!
//! ## Classification
//!
//! Records carry a type tag: `credential`, `cookie`, `vault`, `system`, or
//! `user_file`. System records merge onto the system's scalar fields,
//! last writer wins; everything else appends to the matching collection.
//! Records with any other tag are counted and ignored - custom definitions
//! must map onto one of the five record families to aggregate.
//!
//! ## Browser / Profile Inference
//!
//! Cookie and vault records frequently lack provenance in the file body.
//! When the record itself (via path extractors) does not carry browser or
//! profile, the aggregator infers them from the filepath: known browser
//! substrings, known profile directory names, and the
//! `Wallets/<Browser Profile>/` convention used for wallet grabs.
//!
//! ## Failure Policy
//!
//! Per-file failures - unreadable entries, selector errors, parse errors -
//! are logged with `(path, parser)` and skipped. Partial failure is always
//! tolerated; only cancellation aborts the leak.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use leaksift_bootstrap::CancellationToken;
use leaksift_domain::entities::{
    Cookie, Credential, Leak, ParsedRecord, SystemData, UserFile, Vault, VaultType,
};
use leaksift_domain::error::SiftError;
use leaksift_domain::services::Archive;

use crate::infrastructure::parsing::ParserSelector;

use super::user_file_scanner::UserFileScanner;

const BROWSERS: [&str; 4] = ["chrome", "brave", "edge", "firefox"];
const PROFILE_NAMES: [&str; 5] = ["default", "profile 1", "profile1", "profile 2", "profile2"];

/// Orchestrates the processing of a leak from an archive.
pub struct LeakProcessor {
    selector: Arc<ParserSelector>,
    scanner: UserFileScanner,
}

impl LeakProcessor {
    pub fn new(selector: Arc<ParserSelector>, user_file_keywords: &[String]) -> Self {
        Self {
            selector,
            scanner: UserFileScanner::new(user_file_keywords),
        }
    }

    /// Process every system directory in an archive.
    ///
    /// # Errors
    ///
    /// Only cancellation aborts processing; every per-file failure is
    /// absorbed into a log event and a skip.
    pub fn process_leak(
        &self,
        archive: &dyn Archive,
        cancel: &CancellationToken,
    ) -> Result<Leak, SiftError> {
        debug!(archive = archive.filename(), "processing leak");
        let mut aggregate = SystemAggregate::new();

        for path in archive.entries() {
            if cancel.is_cancelled() {
                return Err(SiftError::Cancelled(format!(
                    "leak processing interrupted: {}",
                    archive.filename()
                )));
            }
            if path.ends_with('/') {
                continue;
            }

            let text = match archive.read(&path) {
                Ok(text) => text,
                Err(err) => {
                    warn!(path = %path, error = %err, "unreadable archive entry, skipping");
                    continue;
                }
            };

            let selected = match self.selector.select(&path, ParserSelector::sample(&text)) {
                Ok(selected) => selected,
                Err(err) => {
                    warn!(path = %path, error = %err, "parser selection failed, skipping");
                    continue;
                }
            };
            let Some(parser) = selected else {
                // Unselectable files are expected chaff, but may still be
                // interesting user files.
                if let Some(user_file) = self.scanner.scan(&path, &text) {
                    aggregate.system_for(&path).user_files.push(user_file);
                }
                continue;
            };

            // A claimed file creates its system even when it yields no
            // records; the directory is evidence of a victim machine.
            aggregate.system_for(&path);

            match parser.parse(&text, &path) {
                Ok(records) => {
                    debug!(path = %path, parser = %parser.name(), records = records.len(), "parsed");
                    for record in records {
                        aggregate.attach(record, &path);
                    }
                }
                Err(err) => {
                    warn!(path = %path, parser = %parser.name(), error = %err, "parse failed, skipping file");
                }
            }
        }

        let mut leak = Leak::new(archive.filename());
        leak.systems = aggregate.into_systems();
        debug!(archive = archive.filename(), systems = leak.systems.len(), "leak parsed");
        Ok(leak)
    }
}

/// Per-system aggregation state, preserving first-encounter order.
struct SystemAggregate {
    order: Vec<String>,
    systems: HashMap<String, SystemData>,
}

impl SystemAggregate {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            systems: HashMap::new(),
        }
    }

    /// The system owning `filepath`, created on first sight.
    fn system_for(&mut self, filepath: &str) -> &mut SystemData {
        let key = system_dir(filepath);
        if !self.systems.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.systems.entry(key).or_default()
    }

    fn into_systems(mut self) -> Vec<SystemData> {
        self.order
            .iter()
            .filter_map(|key| self.systems.remove(key))
            .collect()
    }

    /// Classify one record by its type tag and append it to the owning
    /// system.
    fn attach(&mut self, record: ParsedRecord, filepath: &str) {
        match record.record_type.as_str() {
            "credential" => {
                let credential = Credential::new(
                    field(&record, &["software", "soft"]),
                    field(&record, &["host", "url"]),
                    field(&record, &["username", "user", "login"]),
                    field(&record, &["password", "pass"]),
                    filepath,
                    field(&record, &["stealer_name"]),
                );
                self.system_for(filepath).credentials.push(credential);
            }
            "cookie" => {
                if let Some(cookie) = build_cookie(&record, filepath) {
                    self.system_for(filepath).cookies.push(cookie);
                }
            }
            "vault" => {
                if let Some(vault) = build_vault(&record, filepath) {
                    self.system_for(filepath).vaults.push(vault);
                }
            }
            "system" => {
                let system_data = self.system_for(filepath);
                for (name, value) in &record.fields {
                    system_data.system.apply_field(name, value);
                }
            }
            "user_file" => {
                let mut user_file = UserFile::new(
                    field(&record, &["file_path"]).unwrap_or_else(|| filepath.to_string()),
                );
                user_file.file_size =
                    field(&record, &["file_size"]).and_then(|v| v.parse().ok());
                user_file.target_hits =
                    field(&record, &["target_hits"]).and_then(|v| v.parse().ok());
                user_file.detected_patterns = field(&record, &["detected_patterns"]);
                user_file.stealer_name = field(&record, &["stealer_name"]);
                self.system_for(filepath).user_files.push(user_file);
            }
            other => {
                debug!(record_type = other, filepath, "unclassifiable record type, ignoring");
            }
        }
    }
}

/// Segment before the first `/`; entries without one belong to the
/// ambient system keyed by the empty string.
fn system_dir(filepath: &str) -> String {
    match filepath.split_once('/') {
        Some((first, _)) => first.to_string(),
        None => String::new(),
    }
}

fn field(record: &ParsedRecord, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| record.field(name))
        .map(str::to_string)
}

fn build_cookie(record: &ParsedRecord, filepath: &str) -> Option<Cookie> {
    // Cookie provenance is normalized to lowercase: `Chrome_Default.txt`
    // and `chrome/Default/Cookies.txt` name the same browser.
    let browser = record
        .browser
        .clone()
        .or_else(|| infer_browser(filepath))
        .map(|browser| browser.to_lowercase())
        .unwrap_or_else(|| "unknown".to_string());
    let profile = record
        .profile
        .clone()
        .or_else(|| infer_profile(filepath))
        .map(|profile| profile.to_lowercase())
        .unwrap_or_else(|| "unknown".to_string());
    Some(Cookie {
        domain: record.field("domain")?.to_string(),
        domain_specified: record.field("domain_specified")?.eq_ignore_ascii_case("TRUE"),
        path: record.field("path")?.to_string(),
        secure: record.field("secure")?.eq_ignore_ascii_case("TRUE"),
        expiry: record
            .field("expiry")?
            .parse::<i64>()
            .unwrap_or(0)
            .max(0),
        name: record.field("name")?.to_string(),
        value: record.field("value")?.to_string(),
        browser,
        profile,
        filepath: filepath.to_string(),
        stealer_name: field(record, &["stealer_name"]),
    })
}

fn build_vault(record: &ParsedRecord, filepath: &str) -> Option<Vault> {
    let vault_type = record
        .field("vault_type")
        .and_then(VaultType::parse)
        .unwrap_or(VaultType::Generic);
    let mut vault = Vault::new(vault_type, filepath);
    vault.vault_data = field(record, &["vault_data"]);
    vault.kdf = field(record, &["kdf"]);
    vault.cipher = field(record, &["cipher"]);
    vault.address = field(record, &["address"]);
    vault.key_phrase = field(record, &["key_phrase"]);
    vault.seed_words = field(record, &["seed_words"]);
    vault.stealer_name = field(record, &["stealer_name"]);

    let wallet_dir = wallet_dir_split(filepath);
    vault.browser = record
        .browser
        .clone()
        .or_else(|| wallet_dir.as_ref().map(|(browser, _)| browser.clone()))
        .or_else(|| infer_browser(filepath))
        .unwrap_or_else(|| "unknown".to_string());
    vault.profile = record
        .profile
        .clone()
        .or_else(|| wallet_dir.map(|(_, profile)| profile))
        .or_else(|| infer_profile(filepath))
        .unwrap_or_else(|| "unknown".to_string());
    Some(vault)
}

/// Case-insensitive first hit on the known browser names.
fn infer_browser(filepath: &str) -> Option<String> {
    let lowered = filepath.to_lowercase();
    BROWSERS
        .iter()
        .find(|browser| lowered.contains(*browser))
        .map(|browser| browser.to_string())
}

/// First path segment equal to a known profile directory name. Filename
/// segments are additionally tokenized on `_` and `.` so exports like
/// `Chrome_Default.txt` resolve. Returns the canonical lowercase name.
fn infer_profile(filepath: &str) -> Option<String> {
    for segment in filepath.split('/') {
        let lowered = segment.to_lowercase();
        if PROFILE_NAMES.contains(&lowered.as_str()) {
            return Some(lowered);
        }
        for token in segment.split(['_', '.']) {
            let lowered = token.to_lowercase();
            if PROFILE_NAMES.contains(&lowered.as_str()) {
                return Some(lowered);
            }
        }
    }
    None
}

/// `…/Wallets/<BrowserName ProfileName>/…` → (browser, profile).
fn wallet_dir_split(filepath: &str) -> Option<(String, String)> {
    let segments: Vec<&str> = filepath.split('/').collect();
    let wallets_at = segments
        .iter()
        .position(|segment| segment.eq_ignore_ascii_case("wallets"))?;
    let target = segments.get(wallets_at + 1)?;
    let (browser, profile) = target.split_once(' ')?;
    Some((browser.to_string(), profile.to_string()))
}
