// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Domain entities: the typed records the parsing engine produces and the
//! aggregates that own them.

pub mod cookie;
pub mod credential;
pub mod leak;
pub mod record;
pub mod system;
pub mod user_file;
pub mod vault;

pub use cookie::{split_cookie_line, write_netscape, Cookie, NETSCAPE_HEADER};
pub use credential::{extract_authority, registered_domain, split_email, Credential};
pub use leak::{Leak, SystemData};
pub use record::{ParsedRecord, RawRecord};
pub use system::System;
pub use user_file::UserFile;
pub use vault::{truncate_vault_data, Vault, VaultType, VAULT_DATA_MAX};
