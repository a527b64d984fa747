// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Credential Entity
//!
//! One harvested login. The raw material is whatever the stealer dumped -
//! usually a software label, a URL or host, a username, and a password.
//! Three fields are derived at construction time:
//!
//! - `host`: the authority portion of the URL (scheme, userinfo, path,
//!   query, and port stripped), or the raw host value when it is not a URL.
//! - `domain`: the registered domain - the last two labels when the host
//!   has at least two, otherwise the host itself.
//! - `local_part` / `email_domain`: populated when the username looks like
//!   an email address (exactly one `@` with non-empty sides), such that
//!   `local_part ++ "@" ++ email_domain == username`.

use serde::{Deserialize, Serialize};

/// A single compromised login.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub software: Option<String>,
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub domain: Option<String>,
    pub local_part: Option<String>,
    pub email_domain: Option<String>,
    pub filepath: String,
    pub stealer_name: Option<String>,
}

impl Credential {
    /// Build a credential from raw extracted values, deriving host, domain,
    /// and email parts.
    pub fn new(
        software: Option<String>,
        raw_host: Option<String>,
        username: Option<String>,
        password: Option<String>,
        filepath: impl Into<String>,
        stealer_name: Option<String>,
    ) -> Self {
        let host = raw_host.as_deref().map(extract_authority);
        let domain = host.as_deref().map(registered_domain);
        let (local_part, email_domain) = match username.as_deref().and_then(split_email) {
            Some((local, domain)) => (Some(local), Some(domain)),
            None => (None, None),
        };
        Self {
            software,
            host,
            username,
            password,
            domain,
            local_part,
            email_domain,
            filepath: filepath.into(),
            stealer_name,
        }
    }
}

/// Extract the authority (hostname) from a URL-ish string.
///
/// Handles `scheme://user@host:port/path` shapes; a value with no scheme
/// separator is treated as already being a host, minus any path suffix.
pub fn extract_authority(value: &str) -> String {
    let value = value.trim();
    let after_scheme = match value.find("://") {
        Some(idx) => &value[idx + 3..],
        None => value,
    };
    let authority = after_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(after_scheme);
    // Drop userinfo, then the port.
    let host = match authority.rfind('@') {
        Some(idx) => &authority[idx + 1..],
        None => authority,
    };
    let host = match host.rfind(':') {
        Some(idx) if host[idx + 1..].chars().all(|c| c.is_ascii_digit()) => &host[..idx],
        _ => host,
    };
    host.to_string()
}

/// Registered-domain heuristic: the last two labels when the host has at
/// least two, otherwise the host unchanged.
pub fn registered_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() >= 2 {
        format!("{}.{}", labels[labels.len() - 2], labels[labels.len() - 1])
    } else {
        host.to_string()
    }
}

/// Split `local@domain` usernames. Returns `None` unless the value contains
/// exactly one `@` with non-empty text on both sides.
pub fn split_email(username: &str) -> Option<(String, String)> {
    let mut parts = username.splitn(2, '@');
    let local = parts.next()?;
    let domain = parts.next()?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some((local.to_string(), domain.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_authority_from_url() {
        assert_eq!(extract_authority("https://example.com"), "example.com");
        assert_eq!(
            extract_authority("https://bank.example.org/login?next=/"),
            "bank.example.org"
        );
        assert_eq!(extract_authority("http://user:pw@host.tld:8080/x"), "host.tld");
    }

    #[test]
    fn test_extract_authority_from_bare_host() {
        assert_eq!(extract_authority("example.com"), "example.com");
        assert_eq!(extract_authority("example.com/path"), "example.com");
        assert_eq!(extract_authority("android://com.app.pkg/"), "com.app.pkg");
    }

    #[test]
    fn test_registered_domain() {
        assert_eq!(registered_domain("bank.example.org"), "example.org");
        assert_eq!(registered_domain("example.com"), "example.com");
        assert_eq!(registered_domain("localhost"), "localhost");
    }

    #[test]
    fn test_split_email() {
        assert_eq!(
            split_email("bob@example.org"),
            Some(("bob".into(), "example.org".into()))
        );
        assert_eq!(split_email("alice"), None);
        assert_eq!(split_email("@example.org"), None);
        assert_eq!(split_email("a@b@c"), None);
    }

    #[test]
    fn test_new_derives_fields() {
        let cred = Credential::new(
            Some("Chrome".into()),
            Some("https://bank.example.org/login".into()),
            Some("bob@example.org".into()),
            Some("hunter2".into()),
            "VICTIM1/Passwords.txt",
            None,
        );
        assert_eq!(cred.host.as_deref(), Some("bank.example.org"));
        assert_eq!(cred.domain.as_deref(), Some("example.org"));
        assert_eq!(cred.local_part.as_deref(), Some("bob"));
        assert_eq!(cred.email_domain.as_deref(), Some("example.org"));
        // Reconstruction invariant
        assert_eq!(
            format!(
                "{}@{}",
                cred.local_part.as_deref().unwrap(),
                cred.email_domain.as_deref().unwrap()
            ),
            cred.username.as_deref().unwrap()
        );
    }

    #[test]
    fn test_new_plain_username_has_no_email_parts() {
        let cred = Credential::new(
            None,
            Some("https://example.com".into()),
            Some("alice".into()),
            Some("secret".into()),
            "VICTIM1/Passwords.txt",
            None,
        );
        assert_eq!(cred.host.as_deref(), Some("example.com"));
        assert_eq!(cred.domain.as_deref(), Some("example.com"));
        assert!(cred.local_part.is_none());
        assert!(cred.email_domain.is_none());
    }
}
