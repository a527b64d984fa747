// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Lightweight metadata record for a scanned user file that hit one or
//! more configured target keywords. The file content itself is never
//! retained.

use serde::{Deserialize, Serialize};

/// Metadata for a user file that matched configured target patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFile {
    pub file_path: String,
    pub file_size: Option<i64>,
    pub target_hits: Option<i64>,
    /// Comma-joined list of the keywords that matched.
    pub detected_patterns: Option<String>,
    pub stealer_name: Option<String>,
}

impl UserFile {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }
}
