// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Legacy Netscape cookie-jar parser. One record per valid seven-field
//! line; comments, blanks, and malformed lines are dropped silently.

use leaksift_domain::entities::{split_cookie_line, ParsedRecord};

const COOKIE_FIELDS: [&str; 7] = [
    "domain",
    "domain_specified",
    "path",
    "secure",
    "expiry",
    "name",
    "value",
];

/// Parse a cookie jar into canonical records.
pub fn parse(text: &str) -> Vec<ParsedRecord> {
    text.lines()
        .filter_map(|line| {
            let fields = split_cookie_line(line)?;
            let mut record = ParsedRecord::new("cookie");
            for (name, value) in COOKIE_FIELDS.iter().zip(fields.iter()) {
                record.fields.insert((*name).to_string(), (*value).to_string());
            }
            Some(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jar_with_malformed_line() {
        let text = "# Netscape\nexample.com\tTRUE\t/\tFALSE\t1735689600\tsid\tabc123\nmalformed line with four fields\n.example.org\tTRUE\t/\tTRUE\t0\ttoken\txyz";
        let records = parse(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field("domain"), Some("example.com"));
        assert_eq!(records[0].field("expiry"), Some("1735689600"));
        assert_eq!(records[1].field("name"), Some("token"));
    }

    #[test]
    fn test_parse_empty_jar() {
        assert!(parse("# Netscape HTTP Cookie File\n\n").is_empty());
    }
}
