// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Legacy credential parser: labeled-line blocks in the shape most stealer
//! families emit -
//!
//! ```text
//! Soft: Chrome
//! URL: https://example.com
//! Login: alice
//! Password: secret
//! ```
//!
//! Label spellings vary (`Host`/`URL`, `User`/`Login`, `Pass`/`Pwd`); a
//! password line completes the current block and flushes a record.

use leaksift_domain::entities::ParsedRecord;
use once_cell::sync::Lazy;
use regex::Regex;

static SOFT: Lazy<Regex> = Lazy::new(|| line_pattern("soft"));
static HOST: Lazy<Regex> = Lazy::new(|| line_pattern("host|url"));
static USER: Lazy<Regex> = Lazy::new(|| line_pattern("login|user"));
static PASSWORD: Lazy<Regex> = Lazy::new(|| line_pattern("password|pass|pwd"));

fn line_pattern(labels: &str) -> Regex {
    Regex::new(&format!(r"(?i)^\s*(?:{labels})\s*:\s*(?P<value>.*\S)\s*$"))
        .expect("builtin credential label pattern is valid")
}

/// Parse labeled credential blocks.
pub fn parse(text: &str) -> Vec<ParsedRecord> {
    let mut records = Vec::new();
    let mut software: Option<String> = None;
    let mut host: Option<String> = None;
    let mut username: Option<String> = None;

    for line in text.lines() {
        // Password labels are a superset of user labels ("pass" vs "user"),
        // so check the most specific first.
        if let Some(value) = capture(&PASSWORD, line) {
            let mut record = ParsedRecord::new("credential");
            if let Some(software) = software.take() {
                record.fields.insert("software".into(), software);
            }
            if let Some(host) = host.take() {
                record.fields.insert("host".into(), host);
            }
            if let Some(username) = username.take() {
                record.fields.insert("username".into(), username);
            }
            record.fields.insert("password".into(), value);
            records.push(record);
        } else if let Some(value) = capture(&USER, line) {
            username = Some(value);
        } else if let Some(value) = capture(&HOST, line) {
            host = Some(value);
        } else if let Some(value) = capture(&SOFT, line) {
            software = Some(value);
        }
    }
    records
}

fn capture(pattern: &Regex, line: &str) -> Option<String> {
    pattern
        .captures(line)
        .and_then(|captures| captures.name("value"))
        .map(|value| value.as_str().to_string())
}
