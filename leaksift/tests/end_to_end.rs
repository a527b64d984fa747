// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end pipeline scenarios: archive in, typed leak out, using the
//! record definitions shipped with the repository.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use leaksift::application::services::LeakProcessor;
use leaksift::infrastructure::archive::MemoryArchive;
use leaksift::infrastructure::parsing::{
    DefinitionStore, ParserFactory, ParserSelector, StrategyRegistry,
};
use leaksift_bootstrap::{CancellationToken, ShutdownCoordinator};
use leaksift_domain::entities::VaultType;
use leaksift_domain::services::Archive;

fn repo_definitions_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(|workspace| workspace.join("record_definitions"))
        .unwrap_or_else(|| PathBuf::from("record_definitions"))
}

fn build_processor(threshold: f64) -> LeakProcessor {
    let store = DefinitionStore::load(&[repo_definitions_dir()]).unwrap();
    assert!(!store.is_empty(), "shipped record definitions must load");
    let factory = ParserFactory::new(Arc::new(StrategyRegistry::with_builtin_strategies()));
    let selector = Arc::new(ParserSelector::new(store, factory, threshold, true));
    LeakProcessor::new(
        selector,
        &["wallet".to_string(), "seed".to_string(), "2fa".to_string()],
    )
}

fn noop_token() -> CancellationToken {
    CancellationToken::noop()
}

#[test]
fn credential_file_produces_derived_credentials() {
    let archive = MemoryArchive::new("leak.zip").with_entry(
        "VICTIM1/Passwords.txt",
        "URL: https://example.com\nUsername: alice\nPassword: secret\n---\nURL: https://bank.example.org/login\nUsername: bob@example.org\nPassword: hunter2\n",
    );
    let leak = build_processor(0.15)
        .process_leak(&archive, &noop_token())
        .unwrap();

    assert_eq!(leak.systems.len(), 1);
    let system = &leak.systems[0];
    assert_eq!(system.credentials.len(), 2);

    let first = &system.credentials[0];
    assert_eq!(first.host.as_deref(), Some("example.com"));
    assert_eq!(first.username.as_deref(), Some("alice"));
    assert_eq!(first.password.as_deref(), Some("secret"));
    assert_eq!(first.domain.as_deref(), Some("example.com"));
    assert!(first.local_part.is_none());

    let second = &system.credentials[1];
    assert_eq!(second.host.as_deref(), Some("bank.example.org"));
    assert_eq!(second.domain.as_deref(), Some("example.org"));
    assert_eq!(second.local_part.as_deref(), Some("bob"));
    assert_eq!(second.email_domain.as_deref(), Some("example.org"));
    assert_eq!(second.filepath, "VICTIM1/Passwords.txt");
}

#[test]
fn netscape_cookie_file_infers_browser_and_profile() {
    let archive = MemoryArchive::new("leak.zip").with_entry(
        "VICTIM1/Cookies/Chrome_Default.txt",
        "# Netscape\nexample.com\tTRUE\t/\tFALSE\t1735689600\tsid\tabc123\nmalformed line with four fields\n.example.org\tTRUE\t/\tTRUE\t0\ttoken\txyz\n",
    );
    let leak = build_processor(0.15)
        .process_leak(&archive, &noop_token())
        .unwrap();

    assert_eq!(leak.systems.len(), 1);
    let cookies = &leak.systems[0].cookies;
    assert_eq!(cookies.len(), 2, "malformed line must be dropped silently");

    assert_eq!(cookies[0].domain, "example.com");
    assert!(cookies[0].domain_specified);
    assert!(!cookies[0].secure);
    assert_eq!(cookies[0].expiry, 1_735_689_600);
    assert_eq!(cookies[0].browser, "chrome");
    assert_eq!(cookies[0].profile, "default");

    assert_eq!(cookies[1].expiry, 0, "0 marks a session cookie");
    assert!(cookies[1].secure);
}

#[test]
fn metamask_vault_in_leveldb_log() {
    let noise = "=1\u{1}\u{7f}garbage garbage garbage ";
    let blob = r#"{\"data\":\"AAA\",\"iv\":\"BBB\",\"salt\":\"CCC\"}"#;
    let content = format!("{noise}{blob} trailing bytes");
    let archive = MemoryArchive::new("leak.zip")
        .with_entry("VICTIM1/Wallets/Chrome Default/000003.log", content);

    let leak = build_processor(0.15)
        .process_leak(&archive, &noop_token())
        .unwrap();

    assert_eq!(leak.systems.len(), 1);
    let vaults = &leak.systems[0].vaults;
    assert_eq!(vaults.len(), 1);
    let vault = &vaults[0];
    assert_eq!(vault.vault_type, VaultType::Metamask);
    assert_eq!(vault.browser, "Chrome");
    assert_eq!(vault.profile, "Default");
    assert!(vault.vault_data.as_ref().unwrap().len() <= 4096);
    assert!(vault.vault_data.as_ref().unwrap().contains("AAA"));
    assert!(vault.key_phrase.is_none());
    assert!(vault.seed_words.is_none());
}

#[test]
fn system_info_file_populates_all_scalar_fields() {
    let archive = MemoryArchive::new("leak.zip").with_entry(
        "VICTIM2/UserInformation.txt",
        "UID: ABCD-1234\nComputer Name: DESKTOP-X\nHWID: 0x00FF\nUser: Admin\nIP: 203.0.113.9\nCountry: CA\nDate: 2024-03-01\n",
    );
    let leak = build_processor(0.15)
        .process_leak(&archive, &noop_token())
        .unwrap();

    assert_eq!(leak.systems.len(), 1);
    let system = &leak.systems[0].system;
    assert_eq!(system.machine_id.as_deref(), Some("ABCD-1234"));
    assert_eq!(system.computer_name.as_deref(), Some("DESKTOP-X"));
    assert_eq!(system.hardware_id.as_deref(), Some("0x00FF"));
    assert_eq!(system.machine_user.as_deref(), Some("Admin"));
    assert_eq!(system.ip_address.as_deref(), Some("203.0.113.9"));
    assert_eq!(system.country.as_deref(), Some("CA"));
    assert_eq!(system.log_date.as_deref(), Some("2024-03-01"));
}

#[test]
fn high_threshold_falls_back_to_legacy_credential_parser() {
    // With θ = 0.99 no definition clears the bar; the filename substring
    // routes the file to the legacy credential parser instead.
    let archive = MemoryArchive::new("leak.zip").with_entry(
        "ROOT/passwords_unexpected.txt",
        "url: https://fallback.example\nuser: x\npass: y\n",
    );
    let leak = build_processor(0.99)
        .process_leak(&archive, &noop_token())
        .unwrap();

    assert_eq!(leak.systems.len(), 1);
    let credentials = &leak.systems[0].credentials;
    assert_eq!(credentials.len(), 1);
    assert_eq!(credentials[0].username.as_deref(), Some("x"));
    assert_eq!(credentials[0].host.as_deref(), Some("fallback.example"));
}

#[test]
fn empty_archive_yields_empty_leak() {
    let archive = MemoryArchive::new("empty.zip");
    let leak = build_processor(0.15)
        .process_leak(&archive, &noop_token())
        .unwrap();
    assert!(leak.is_empty());
    assert_eq!(leak.filename, "empty.zip");
}

#[test]
fn separator_only_file_yields_zero_records() {
    let archive = MemoryArchive::new("leak.zip")
        .with_entry("VICTIM1/passwords_empty.txt", "---\n---\n---\n");
    let leak = build_processor(0.0)
        .process_leak(&archive, &noop_token())
        .unwrap();
    // The file was claimed by the credential definition but produced no
    // records; the system exists with empty collections.
    assert_eq!(leak.systems.len(), 1);
    let total: usize = leak.systems.iter().map(|s| s.record_count()).sum();
    assert_eq!(total, 0);
}

#[test]
fn entries_without_directory_land_in_ambient_system() {
    let archive = MemoryArchive::new("leak.zip").with_entry(
        "passwords.txt",
        "URL: https://example.com\nUsername: a\nPassword: b\n",
    );
    let leak = build_processor(0.15)
        .process_leak(&archive, &noop_token())
        .unwrap();
    assert_eq!(leak.systems.len(), 1);
    assert_eq!(leak.systems[0].credentials.len(), 1);
}

#[test]
fn directory_markers_are_skipped() {
    let archive = MemoryArchive::new("leak.zip")
        .with_entry("VICTIM1/", "")
        .with_entry("VICTIM1/Passwords.txt", "URL: https://e.com\nUser: a\nPass: b\n");
    let leak = build_processor(0.15)
        .process_leak(&archive, &noop_token())
        .unwrap();
    assert_eq!(leak.systems.len(), 1);
}

#[test]
fn unclaimed_file_with_keywords_becomes_user_file() {
    let archive = MemoryArchive::new("leak.zip").with_entry(
        "VICTIM1/notes.txt",
        "remember: hardware wallet in the drawer, seed phrase taped underneath",
    );
    let leak = build_processor(0.15)
        .process_leak(&archive, &noop_token())
        .unwrap();
    assert_eq!(leak.systems.len(), 1);
    let user_files = &leak.systems[0].user_files;
    assert_eq!(user_files.len(), 1);
    assert_eq!(user_files[0].target_hits, Some(2));
    let patterns = user_files[0].detected_patterns.as_deref().unwrap();
    assert!(patterns.contains("wallet") && patterns.contains("seed"));
}

#[test]
fn parsing_twice_is_deterministic() {
    let archive = MemoryArchive::new("leak.zip")
        .with_entry(
            "VICTIM1/Passwords.txt",
            "URL: https://example.com\nUsername: alice\nPassword: secret\n",
        )
        .with_entry(
            "VICTIM1/Cookies/Chrome_Default.txt",
            "example.com\tTRUE\t/\tFALSE\t0\tsid\tv\n",
        )
        .with_entry(
            "VICTIM2/UserInformation.txt",
            "UID: X\nComputer Name: Y\n",
        );
    let processor = build_processor(0.15);
    let first = processor.process_leak(&archive, &noop_token()).unwrap();
    let second = processor.process_leak(&archive, &noop_token()).unwrap();
    assert_eq!(first, second);
    // Record filepaths always name real archive entries.
    let entries = archive.entries();
    for system in &first.systems {
        for credential in &system.credentials {
            assert!(entries.contains(&credential.filepath));
        }
        for cookie in &system.cookies {
            assert!(entries.contains(&cookie.filepath));
        }
    }
}

#[test]
fn cancellation_aborts_the_leak() {
    let archive = MemoryArchive::new("leak.zip")
        .with_entry("VICTIM1/Passwords.txt", "URL: https://e.com\nUser: a\nPass: b\n");
    let coordinator = ShutdownCoordinator::new();
    coordinator.initiate_shutdown();
    let err = build_processor(0.15)
        .process_leak(&archive, &coordinator.token())
        .unwrap_err();
    assert!(err.is_cancellation());
}
