// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Legacy Content-Type Parsers
//!
//! Fixed fallback parsers used when no record definition clears the match
//! threshold. Selection is a filename-substring heuristic - `password`,
//! `cookie`, or one of the system-info keywords - checked in that order.
//! These cover the three file families every stealer ships in some form,
//! so an archive parses usefully even with an empty definitions directory.
//!
//! Legacy parsers emit the same [`ParsedRecord`] shape as definition-backed
//! parsers; the aggregator does not care which path produced a record.

pub mod cookie;
pub mod password;
pub mod system;

use leaksift_domain::entities::ParsedRecord;
use once_cell::sync::Lazy;
use regex::Regex;

static SYSTEM_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(system|information|sysinfo|system_info|machine|pcinfo)")
        .expect("builtin system keyword pattern is valid")
});

/// One of the three fixed legacy parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyParser {
    Password,
    Cookie,
    System,
}

impl LegacyParser {
    /// Filename-substring selection, `password` before `cookie` before the
    /// system-info keywords.
    pub fn for_path(path: &str) -> Option<Self> {
        let lowered = path.to_lowercase();
        if lowered.contains("password") {
            return Some(LegacyParser::Password);
        }
        if lowered.contains("cookie") {
            return Some(LegacyParser::Cookie);
        }
        if SYSTEM_KEYWORDS.is_match(path) {
            return Some(LegacyParser::System);
        }
        None
    }

    /// Parser class name for skip/failure diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            LegacyParser::Password => "PasswordParser",
            LegacyParser::Cookie => "CookieParser",
            LegacyParser::System => "SystemParser",
        }
    }

    /// Parse one file's text into canonical records.
    pub fn parse(&self, text: &str) -> Vec<ParsedRecord> {
        match self {
            LegacyParser::Password => password::parse(text),
            LegacyParser::Cookie => cookie::parse(text),
            LegacyParser::System => system::parse(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_path_substring_priority() {
        assert_eq!(
            LegacyParser::for_path("ROOT/passwords_unexpected.txt"),
            Some(LegacyParser::Password)
        );
        assert_eq!(
            LegacyParser::for_path("VICTIM1/Cookies/Chrome_Default.txt"),
            Some(LegacyParser::Cookie)
        );
        assert_eq!(
            LegacyParser::for_path("VICTIM2/UserInformation.txt"),
            Some(LegacyParser::System)
        );
        assert_eq!(LegacyParser::for_path("VICTIM1/Screenshot.jpg"), None);
    }

    #[test]
    fn test_password_beats_cookie_in_ambiguous_names() {
        assert_eq!(
            LegacyParser::for_path("CookiePasswords.txt"),
            Some(LegacyParser::Password)
        );
    }
}
