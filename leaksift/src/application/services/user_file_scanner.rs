// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # User-File Scanner
//!
//! Files that neither a record definition nor a legacy parser claims are
//! not necessarily worthless: stealers grab arbitrary documents, and a
//! victim's `notes.txt` mentioning a wallet seed matters. The scanner
//! checks unclaimed text against the configured keywords and emits a
//! lightweight metadata record on any hit. File content is never retained
//! on the record.

use leaksift_domain::entities::UserFile;

/// Keyword scanner for otherwise-unclaimed files.
pub struct UserFileScanner {
    /// Lowercased keywords; empty disables the scanner.
    keywords: Vec<String>,
}

impl UserFileScanner {
    pub fn new(keywords: &[String]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Scan one file. Returns a record when at least one keyword occurs in
    /// the content, with total hit count and the matched keywords.
    pub fn scan(&self, path: &str, text: &str) -> Option<UserFile> {
        if self.keywords.is_empty() {
            return None;
        }
        let lowered = text.to_lowercase();
        let mut total_hits: i64 = 0;
        let mut detected: Vec<&str> = Vec::new();
        for keyword in &self.keywords {
            let hits = lowered.matches(keyword.as_str()).count();
            if hits > 0 {
                total_hits += hits as i64;
                detected.push(keyword);
            }
        }
        if total_hits == 0 {
            return None;
        }
        let mut record = UserFile::new(path);
        record.file_size = Some(text.len() as i64);
        record.target_hits = Some(total_hits);
        record.detected_patterns = Some(detected.join(","));
        Some(record)
    }
}
