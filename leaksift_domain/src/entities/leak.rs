// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Leak Aggregate
//!
//! The `Leak` is the root of everything parsed out of one archive. It owns
//! its systems exclusively - two leaks never share a `SystemData` - and
//! lives from the moment the archive is opened until the sink flush
//! completes.
//!
//! ## Ordering
//!
//! Within a system, records appear in the order their source files were
//! emitted by the archive walker, and per file in extraction order. Across
//! systems no ordering is promised, but `systems` preserves
//! first-encounter order so repeated runs over the same archive produce
//! identical values.

use serde::{Deserialize, Serialize};

use super::cookie::Cookie;
use super::credential::Credential;
use super::system::System;
use super::user_file::UserFile;
use super::vault::Vault;

/// One compromised machine plus everything harvested from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemData {
    pub system: System,
    #[serde(default)]
    pub credentials: Vec<Credential>,
    #[serde(default)]
    pub cookies: Vec<Cookie>,
    #[serde(default)]
    pub vaults: Vec<Vault>,
    #[serde(default)]
    pub user_files: Vec<UserFile>,
}

impl SystemData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of child records across all collections.
    pub fn record_count(&self) -> usize {
        self.credentials.len() + self.cookies.len() + self.vaults.len() + self.user_files.len()
    }
}

/// The full parsed output for one archive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leak {
    pub filename: String,
    #[serde(default)]
    pub systems: Vec<SystemData>,
}

impl Leak {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            systems: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_leak() {
        let leak = Leak::new("dump.zip");
        assert!(leak.is_empty());
        assert_eq!(leak.filename, "dump.zip");
    }

    #[test]
    fn test_record_count() {
        let mut data = SystemData::new();
        data.credentials.push(Credential::default());
        data.cookies.push(Cookie::default());
        data.cookies.push(Cookie::default());
        assert_eq!(data.record_count(), 3);
    }

    #[test]
    fn test_leak_json_round_trip() {
        let mut leak = Leak::new("dump.zip");
        let mut data = SystemData::new();
        data.system.apply_field("computer_name", "DESKTOP-X");
        data.user_files.push(UserFile::new("VICTIM1/notes.txt"));
        leak.systems.push(data);

        let json = serde_json::to_string(&leak).unwrap();
        let back: Leak = serde_json::from_str(&json).unwrap();
        assert_eq!(back, leak);
    }
}
