// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Legacy system-information parser: labeled scalar lines copied verbatim
//! onto the system record. Emits a single merged record per file.
//!
//! ```text
//! UID: ABCD-1234
//! Computer Name: DESKTOP-X
//! HWID: 0x00FF
//! ```

use leaksift_domain::entities::ParsedRecord;
use once_cell::sync::Lazy;
use regex::Regex;

/// Label patterns in match order, mapped to canonical system field names.
static LABELS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)^\s*uid\s*:\s*(?P<value>.*\S)\s*$", "machine_id"),
        (r"(?i)^\s*computer\s+name\s*:\s*(?P<value>.*\S)\s*$", "computer_name"),
        (r"(?i)^\s*hwid\s*:\s*(?P<value>.*\S)\s*$", "hardware_id"),
        (r"(?i)^\s*user\s*:\s*(?P<value>.*\S)\s*$", "machine_user"),
        (r"(?i)^\s*ip\s*:\s*(?P<value>.*\S)\s*$", "ip_address"),
        (r"(?i)^\s*country\s*:\s*(?P<value>.*\S)\s*$", "country"),
        (r"(?i)^\s*(?:log\s*)?date\s*:\s*(?P<value>.*\S)\s*$", "log_date"),
    ]
    .iter()
    .map(|(pattern, field)| {
        (
            Regex::new(pattern).expect("builtin system label pattern is valid"),
            *field,
        )
    })
    .collect()
});

/// Parse labeled system-information lines into one merged record.
pub fn parse(text: &str) -> Vec<ParsedRecord> {
    let mut record = ParsedRecord::new("system");
    for line in text.lines() {
        for (pattern, field) in LABELS.iter() {
            if let Some(value) = pattern
                .captures(line)
                .and_then(|captures| captures.name("value"))
            {
                record
                    .fields
                    .insert((*field).to_string(), value.as_str().to_string());
                break;
            }
        }
    }
    if record.is_empty() {
        Vec::new()
    } else {
        vec![record]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_seven_fields() {
        let text = "UID: ABCD-1234\nComputer Name: DESKTOP-X\nHWID: 0x00FF\nUser: Admin\nIP: 203.0.113.9\nCountry: CA\nDate: 2024-03-01";
        let records = parse(text);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.field("machine_id"), Some("ABCD-1234"));
        assert_eq!(record.field("computer_name"), Some("DESKTOP-X"));
        assert_eq!(record.field("hardware_id"), Some("0x00FF"));
        assert_eq!(record.field("machine_user"), Some("Admin"));
        assert_eq!(record.field("ip_address"), Some("203.0.113.9"));
        assert_eq!(record.field("country"), Some("CA"));
        assert_eq!(record.field("log_date"), Some("2024-03-01"));
    }

    #[test]
    fn test_log_date_label_variant() {
        let records = parse("Log Date: 2024-04-02");
        assert_eq!(records[0].field("log_date"), Some("2024-04-02"));
    }

    #[test]
    fn test_unlabeled_file_emits_nothing() {
        assert!(parse("nothing labeled here").is_empty());
    }
}
