// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Settings
//!
//! Environment-driven configuration, layered defaults-first:
//!
//! 1. Built-in defaults (every field has one),
//! 2. an optional TOML file (`leaksift.toml`, or the `--config` path),
//! 3. environment variables prefixed `LEAKSIFT_` (e.g. `LEAKSIFT_DB_HOST`,
//!    `LEAKSIFT_PARSER_MATCH_THRESHOLD`). List-valued options accept
//!    comma-separated values.
//!
//! Secrets stay out of files; `LEAKSIFT_DB_PASSWORD` is the expected way
//! to supply the sink password.

use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use leaksift_domain::error::SiftError;

/// Application settings, flat like the environment that feeds them.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    // Sink connection
    #[serde(default = "default_db_host")]
    pub db_host: String,
    #[serde(default = "default_db_port")]
    pub db_port: u16,
    #[serde(default = "default_db_name")]
    pub db_name: String,
    #[serde(default = "default_db_user")]
    pub db_user: String,
    #[serde(default)]
    pub db_password: String,
    /// Recreate the sink schema before the first write.
    #[serde(default)]
    pub db_create_schema: bool,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    // Parser selection
    /// Enable the scored selector; off means legacy parsers only.
    #[serde(default = "default_true")]
    pub prefer_definition_parsers: bool,
    /// Search roots for record definition files.
    #[serde(default = "default_definitions_dirs")]
    pub record_definitions_dirs: Vec<String>,
    /// θ for the definition-match scorer.
    #[serde(default = "default_match_threshold")]
    pub parser_match_threshold: f64,

    // Runtime
    /// Concurrent leak workers (between-leak parallelism).
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// Case-insensitive keywords the user-file scanner looks for. Empty
    /// disables the scanner.
    #[serde(default = "default_user_file_keywords")]
    pub user_file_keywords: Vec<String>,
}

fn default_db_host() -> String {
    "localhost".to_string()
}
fn default_db_port() -> u16 {
    5432
}
fn default_db_name() -> String {
    "leaksift".to_string()
}
fn default_db_user() -> String {
    "leaksift".to_string()
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_true() -> bool {
    true
}
fn default_definitions_dirs() -> Vec<String> {
    vec!["record_definitions".to_string()]
}
fn default_match_threshold() -> f64 {
    0.15
}
fn default_worker_count() -> usize {
    4
}
fn default_user_file_keywords() -> Vec<String> {
    ["wallet", "seed", "2fa", "backup", "recovery"]
        .iter()
        .map(|keyword| keyword.to_string())
        .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_host: default_db_host(),
            db_port: default_db_port(),
            db_name: default_db_name(),
            db_user: default_db_user(),
            db_password: String::new(),
            db_create_schema: false,
            db_max_connections: default_db_max_connections(),
            prefer_definition_parsers: true,
            record_definitions_dirs: default_definitions_dirs(),
            parser_match_threshold: default_match_threshold(),
            worker_count: default_worker_count(),
            user_file_keywords: default_user_file_keywords(),
        }
    }
}

impl Settings {
    /// Load settings from the optional config file and the environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self, SiftError> {
        let mut builder = Config::builder();
        builder = match config_file {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("leaksift").required(false)),
        };
        builder = builder.add_source(
            Environment::with_prefix("LEAKSIFT")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("record_definitions_dirs")
                .with_list_parse_key("user_file_keywords"),
        );
        builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|err| SiftError::ValidationError(format!("configuration: {err}")))
    }
}
