// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Compromised System
//!
//! One `System` per unique top-level directory inside a leak archive.
//! Stealers write one directory per victim machine; the scalar attributes
//! here come from the system-information file most families drop
//! (`UserInformation.txt`, `System.txt`, ...).
//!
//! All attributes are optional: many archives contain directories with
//! credentials but no system dump. System records are merged field-by-field
//! with last-writer-wins semantics, because some families split machine
//! information across several files.

use serde::{Deserialize, Serialize};

/// Scalar attributes of one compromised machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct System {
    pub machine_id: Option<String>,
    pub computer_name: Option<String>,
    pub hardware_id: Option<String>,
    pub machine_user: Option<String>,
    pub ip_address: Option<String>,
    pub country: Option<String>,
    pub log_date: Option<String>,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one canonical system field by name, overwriting any previous
    /// value (last writer wins). Unknown names are ignored so that custom
    /// definitions can carry extra fields without breaking aggregation.
    pub fn apply_field(&mut self, name: &str, value: &str) {
        let value = Some(value.to_string());
        match name {
            "machine_id" => self.machine_id = value,
            "computer_name" => self.computer_name = value,
            "hardware_id" => self.hardware_id = value,
            "machine_user" => self.machine_user = value,
            "ip_address" => self.ip_address = value,
            "country" => self.country = value,
            "log_date" => self.log_date = value,
            _ => {}
        }
    }

    /// True when no attribute has been populated.
    pub fn is_empty(&self) -> bool {
        self.machine_id.is_none()
            && self.computer_name.is_none()
            && self.hardware_id.is_none()
            && self.machine_user.is_none()
            && self.ip_address.is_none()
            && self.country.is_none()
            && self.log_date.is_none()
    }
}
