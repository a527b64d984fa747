// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Cookie Entity and Netscape Jar Codec
//!
//! Stealers export browser cookies in the Netscape cookie-jar format: one
//! cookie per line, seven fields separated by tabs:
//!
//! ```text
//! <domain> <domain_specified> <path> <secure> <expiry> <name> <value>
//! ```
//!
//! Real-world dumps are sloppy - some families substitute runs of spaces
//! for tabs - so decoding tries an exact tab split first and falls back to
//! a whitespace split capped at seven pieces (the cookie *value* may itself
//! contain whitespace). A line that yields anything other than exactly
//! seven fields either way is dropped.
//!
//! Booleans are native `bool` inside the domain and render as
//! `TRUE`/`FALSE` only at the jar and sink boundaries. Expiry is integer
//! seconds since the epoch; `0` means a session cookie.

use serde::{Deserialize, Serialize};

/// Header line of an exported cookie jar.
pub const NETSCAPE_HEADER: &str = "# Netscape HTTP Cookie File";

/// A single browser cookie harvested from a leak.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub domain: String,
    pub domain_specified: bool,
    pub path: String,
    pub secure: bool,
    /// Seconds since the epoch; 0 = session cookie.
    pub expiry: i64,
    pub name: String,
    pub value: String,
    pub browser: String,
    pub profile: String,
    pub filepath: String,
    pub stealer_name: Option<String>,
}

impl Cookie {
    /// Decode one jar line. Returns `None` for comments, blanks, and lines
    /// violating the seven-field invariant.
    pub fn from_line(line: &str, browser: &str, profile: &str, filepath: &str) -> Option<Self> {
        let fields = split_cookie_line(line)?;
        Some(Self {
            domain: fields[0].to_string(),
            domain_specified: parse_jar_bool(fields[1]),
            path: fields[2].to_string(),
            secure: parse_jar_bool(fields[3]),
            expiry: fields[4].parse::<i64>().unwrap_or(0).max(0),
            name: fields[5].to_string(),
            value: fields[6].to_string(),
            browser: browser.to_string(),
            profile: profile.to_string(),
            filepath: filepath.to_string(),
            stealer_name: None,
        })
    }

    /// Render this cookie as one Netscape jar line.
    pub fn to_netscape_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.domain,
            render_jar_bool(self.domain_specified),
            self.path,
            render_jar_bool(self.secure),
            self.expiry,
            self.name,
            self.value
        )
    }
}

/// Split a jar line into its seven fields, tabs first, whitespace fallback.
///
/// Returns `None` for empty lines, comment lines, and lines that do not
/// produce exactly seven fields either way.
pub fn split_cookie_line(line: &str) -> Option<[&str; 7]> {
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let tab_fields: Vec<&str> = line.split('\t').collect();
    if tab_fields.len() == 7 {
        return tab_fields.try_into().ok();
    }
    let ws_fields = split_whitespace_runs(line, 7);
    if ws_fields.len() == 7 {
        return ws_fields.try_into().ok();
    }
    None
}

/// Split on runs of whitespace, keeping everything past the
/// `max_fields - 1`th separator in the final field (the cookie value may
/// contain spaces).
fn split_whitespace_runs(line: &str, max_fields: usize) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut rest = line;
    while fields.len() + 1 < max_fields {
        match rest.find(char::is_whitespace) {
            Some(start) => {
                fields.push(&rest[..start]);
                let tail = &rest[start..];
                let run_len = tail.len() - tail.trim_start().len();
                rest = &tail[run_len..];
            }
            None => break,
        }
    }
    fields.push(rest);
    fields
}

/// Render a cookie set as a Netscape jar, round-trippable through
/// [`split_cookie_line`].
pub fn write_netscape(cookies: &[Cookie]) -> String {
    let mut out = String::from(NETSCAPE_HEADER);
    out.push('\n');
    for cookie in cookies {
        out.push_str(&cookie.to_netscape_line());
        out.push('\n');
    }
    out
}

fn parse_jar_bool(field: &str) -> bool {
    field.eq_ignore_ascii_case("TRUE")
}

fn render_jar_bool(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tab_delimited_line() {
        let line = "example.com\tTRUE\t/\tFALSE\t1735689600\tsid\tabc123";
        let fields = split_cookie_line(line).unwrap();
        assert_eq!(fields[0], "example.com");
        assert_eq!(fields[4], "1735689600");
        assert_eq!(fields[6], "abc123");
    }

    #[test]
    fn test_split_whitespace_fallback() {
        // Runs of whitespace collapse into one separator.
        let line = ".example.org  TRUE / TRUE 0 token xyz";
        let fields = split_cookie_line(line).unwrap();
        assert_eq!(fields[0], ".example.org");
        assert_eq!(fields[6], "xyz");

        // Everything past the sixth separator stays in the value field.
        let line = ".example.org TRUE / TRUE 0 token xyz with spaces";
        let fields = split_cookie_line(line).unwrap();
        assert_eq!(fields[6], "xyz with spaces");
    }

    #[test]
    fn test_split_rejects_six_tokens() {
        assert!(split_cookie_line("a.example TRUE / TRUE 0 name").is_none());
    }

    #[test]
    fn test_split_rejects_malformed_lines() {
        assert!(split_cookie_line("").is_none());
        assert!(split_cookie_line("# comment").is_none());
        assert!(split_cookie_line("malformed line with four fields").is_none());
    }

    #[test]
    fn test_from_line_parses_types() {
        let cookie =
            Cookie::from_line("example.com\tTRUE\t/\tFALSE\t1735689600\tsid\tabc123", "chrome", "Default", "VICTIM1/Cookies/Chrome_Default.txt")
                .unwrap();
        assert!(cookie.domain_specified);
        assert!(!cookie.secure);
        assert_eq!(cookie.expiry, 1_735_689_600);
        assert_eq!(cookie.browser, "chrome");
    }

    #[test]
    fn test_from_line_bad_expiry_becomes_session() {
        let cookie =
            Cookie::from_line("a.example\tTRUE\t/\tTRUE\tnever\tsid\tv", "unknown", "unknown", "f").unwrap();
        assert_eq!(cookie.expiry, 0);
        let negative =
            Cookie::from_line("a.example\tTRUE\t/\tTRUE\t-5\tsid\tv", "unknown", "unknown", "f").unwrap();
        assert_eq!(negative.expiry, 0);
    }

    #[test]
    fn test_netscape_round_trip() {
        let original = vec![
            Cookie::from_line("example.com\tTRUE\t/\tFALSE\t1735689600\tsid\tabc123", "chrome", "Default", "jar").unwrap(),
            Cookie::from_line(".example.org\tTRUE\t/\tTRUE\t0\ttoken\txyz", "chrome", "Default", "jar").unwrap(),
        ];
        let jar = write_netscape(&original);
        assert!(jar.starts_with(NETSCAPE_HEADER));
        let reparsed: Vec<Cookie> = jar
            .lines()
            .filter_map(|line| Cookie::from_line(line, "chrome", "Default", "jar"))
            .collect();
        assert_eq!(reparsed, original);
    }
}
