// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Definition-Match Scorer
//!
//! Scores a `(definition, file)` pair from cheap signals: does a filename
//! glob match, and how many separator, header, and alias patterns fire over
//! a sampled prefix of the file. The score is normalized by line count with
//! a floor of 10 so a two-line file cannot reach a spuriously high score
//! from a single header hit.
//!
//! ```text
//! score = (path_score
//!          + separator_hits * w.separator
//!          + header_hits    * w.header
//!          + alias_hits     * w.alias) / max(10, line_count)
//! ```
//!
//! Scoring must stay cheap: it runs once per archive entry over tens of
//! thousands of entries, on a bounded sample (the caller passes at most
//! ~200 lines from the first 12 KB).
//!
//! ## Tie-breaking
//!
//! Two definitions can clear the threshold with equal scores. The earlier
//! definition in load order wins; the store guarantees load order is
//! stable (directories in configured order, files sorted by path).

use crate::definitions::RecordDefinition;
use crate::error::SiftError;

/// Score one definition against a sampled file.
///
/// `path` is the archive entry name; `sample_lines` the sampled prefix.
/// The result is non-negative and monotonic in each hit count.
pub fn score_definition(
    path: &str,
    sample_lines: &[&str],
    definition: &RecordDefinition,
) -> Result<f64, SiftError> {
    let compiled = definition.patterns()?;
    let weights = definition.score_weights;
    let mut score = 0.0;

    if compiled.globs.is_match(path) {
        score += weights.path;
    }

    let separator_hits: usize = sample_lines
        .iter()
        .map(|line| compiled.separators.iter().filter(|sep| sep.is_match(line)).count())
        .sum();
    let header_hits: usize = sample_lines
        .iter()
        .map(|line| compiled.headers.iter().filter(|hdr| hdr.is_match(line)).count())
        .sum();
    let alias_hits: usize = sample_lines
        .iter()
        .map(|line| compiled.aliases.iter().filter(|alias| alias.is_match(line)).count())
        .sum();

    score += separator_hits as f64 * weights.separator;
    score += header_hits as f64 * weights.header;
    score += alias_hits as f64 * weights.alias;

    let denominator = sample_lines.len().max(10) as f64;
    Ok(score / denominator)
}

/// Pick the best-scoring definition at or above `threshold`.
///
/// Returns the winning definition and its score, or `None` when nothing
/// clears the threshold. On equal scores the earlier definition wins.
pub fn best_match<'a>(
    path: &str,
    sample_lines: &[&str],
    definitions: &'a [RecordDefinition],
    threshold: f64,
) -> Result<Option<(&'a RecordDefinition, f64)>, SiftError> {
    let mut best: Option<(&RecordDefinition, f64)> = None;
    for definition in definitions {
        let score = score_definition(path, sample_lines, definition)?;
        let better = match best {
            Some((_, best_score)) => score > best_score,
            None => true,
        };
        if better {
            best = Some((definition, score));
        }
    }
    Ok(best.filter(|(_, score)| *score >= threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential_definition() -> RecordDefinition {
        serde_json::from_value(serde_json::json!({
            "key": "credential",
            "file_globs": ["**/passwords*.txt"],
            "record_separators": ["^-{2,}\\s*$"],
            "fields": [
                {"name": "username", "aliases": ["user", "login"],
                 "header_patterns": ["^(username|user|login)\\s*[:=]"]},
                {"name": "password", "aliases": ["pass", "pwd"],
                 "header_patterns": ["^(password|pass|pwd)\\s*[:=]"]}
            ]
        }))
        .unwrap()
    }

    fn sample() -> Vec<&'static str> {
        vec![
            "Username: alice",
            "Password: secret",
            "--",
            "Username: bob",
            "Password: hunter2",
        ]
    }

    #[test]
    fn test_score_combines_signals() {
        let definition = credential_definition();
        let lines = sample();
        let score = score_definition("VICTIM1/passwords_1.txt", &lines, &definition).unwrap();
        // 4 header hits * 2.0 + 1 separator + glob path weight 1.0, over
        // the denominator floor of 10.
        assert!(score > 0.15, "score was {score}");
    }

    #[test]
    fn test_score_nonnegative_on_miss() {
        let definition = credential_definition();
        let lines = vec!["nothing", "matches", "here"];
        let score = score_definition("VICTIM1/notes.txt", &lines, &definition).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_denominator_floor_limits_tiny_files() {
        let definition = credential_definition();
        let lines = vec!["Username: x"];
        let score = score_definition("other.txt", &lines, &definition).unwrap();
        // One header hit (2.0) plus the `user` alias substring hit (0.5),
        // over the floor of 10 rather than the single-line count.
        assert!((score - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_best_match_respects_threshold() {
        let definition = credential_definition();
        let defs = vec![definition];
        let lines = sample();
        let hit = best_match("VICTIM1/passwords_1.txt", &lines, &defs, 0.15).unwrap();
        assert!(hit.is_some());
        let miss = best_match("VICTIM1/passwords_1.txt", &lines, &defs, 0.99).unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn test_best_match_zero_threshold_selects_max() {
        let defs = vec![credential_definition()];
        let lines: Vec<String> = (0..1000).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let hit = best_match("x.txt", &refs, &defs, 0.0).unwrap();
        assert!(hit.is_some(), "threshold 0 always selects the max");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn score_is_nonnegative(lines in proptest::collection::vec("[ -~]{0,40}", 0..50)) {
                let definition = credential_definition();
                let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
                let score = score_definition("any/path.txt", &refs, &definition).unwrap();
                prop_assert!(score >= 0.0);
            }

            #[test]
            fn score_is_monotonic_in_header_hits(hits in 0usize..20) {
                let definition = credential_definition();
                // Fixed line count of 20: `hits` matching lines, the rest inert.
                let lines: Vec<String> = (0..20)
                    .map(|i| {
                        if i < hits {
                            "Username: alice".to_string()
                        } else {
                            "inert line".to_string()
                        }
                    })
                    .collect();
                let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
                let score = score_definition("x.txt", &refs, &definition).unwrap();

                let more: Vec<String> = (0..20)
                    .map(|i| {
                        if i <= hits {
                            "Username: alice".to_string()
                        } else {
                            "inert line".to_string()
                        }
                    })
                    .collect();
                let more_refs: Vec<&str> = more.iter().map(String::as_str).collect();
                let higher = score_definition("x.txt", &more_refs, &definition).unwrap();
                prop_assert!(higher >= score);
            }
        }
    }

    #[test]
    fn test_ties_prefer_earlier_definition() {
        let first = credential_definition();
        let mut second = credential_definition();
        second.key = "credential_copy".to_string();
        let defs = vec![first, second];
        let lines = sample();
        let (winner, _) = best_match("VICTIM1/passwords_1.txt", &lines, &defs, 0.0)
            .unwrap()
            .unwrap();
        assert_eq!(winner.key, "credential");
    }
}
