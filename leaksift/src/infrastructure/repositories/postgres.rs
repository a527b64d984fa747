// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # PostgreSQL Sink
//!
//! Transactional bulk writer for parsed leaks. One transaction per leak:
//! the leak row goes in first, then each system with its children
//! bulk-inserted per table, then the leak's `systems_count` is updated.
//! Everything commits together or rolls back together - readers of the
//! sink never observe a partial leak.
//!
//! ## Batching
//!
//! Child inserts use `QueryBuilder::push_values`, chunked to stay well
//! under the PostgreSQL bind-parameter ceiling. Row-by-row inserts are
//! never issued.
//!
//! ## Truncation
//!
//! String values are clipped to their column maxima before binding; a
//! clipped value ends in `...`. Stealer dumps regularly contain
//! pathological field lengths, and a leak export must not fail on them.
//!
//! ## Retry
//!
//! `export_leak` wraps the transaction in the transient-error retry loop
//! (three attempts, exponential backoff with jitter). Non-transient
//! database errors surface immediately after rollback.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder, Transaction};
use tracing::{debug, info};

use leaksift_domain::entities::{Cookie, Credential, Leak, System, UserFile, Vault};
use leaksift_domain::error::SiftError;
use leaksift_domain::services::{ExportStats, LeakSink};

use super::retry::with_retry;
use crate::infrastructure::config::Settings;

/// Rows per bulk-insert statement. 500 rows at ≤ 14 columns keeps each
/// statement far from the 65535 bind-parameter ceiling.
const INSERT_CHUNK: usize = 500;

/// PostgreSQL implementation of the leak sink.
pub struct PostgresLeakSink {
    pool: PgPool,
}

impl PostgresLeakSink {
    /// Connect using the configured database settings.
    pub async fn connect(settings: &Settings) -> Result<Self, SiftError> {
        let options = PgConnectOptions::new()
            .host(&settings.db_host)
            .port(settings.db_port)
            .database(&settings.db_name)
            .username(&settings.db_user)
            .password(&settings.db_password);
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(settings.db_max_connections)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool (tests, embedded use).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Verify connectivity before the first export.
    pub async fn ping(&self) -> Result<(), SiftError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Create the sink schema if missing.
    pub async fn ensure_schema(&self) -> Result<(), SiftError> {
        super::schema::create_schema(&self.pool).await
    }

    /// Drop and recreate the sink schema.
    pub async fn recreate_schema(&self) -> Result<(), SiftError> {
        info!("recreating sink schema");
        super::schema::recreate_schema(&self.pool).await
    }

    async fn export_once(&self, leak: &Leak) -> Result<ExportStats, SiftError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let mut stats = ExportStats::default();

        let leak_id: i64 = sqlx::query_scalar(
            "INSERT INTO leaks (filename, systems_count) VALUES ($1, $2) RETURNING id",
        )
        .bind(&leak.filename)
        .bind(0_i32)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        for system_data in &leak.systems {
            let system_id = insert_system(&mut tx, leak_id, &system_data.system).await?;
            stats.systems += 1;
            stats.credentials +=
                insert_credentials(&mut tx, system_id, &system_data.credentials).await?;
            stats.cookies += insert_cookies(&mut tx, system_id, &system_data.cookies).await?;
            stats.vaults += insert_vaults(&mut tx, system_id, &system_data.vaults).await?;
            stats.user_files +=
                insert_user_files(&mut tx, system_id, &system_data.user_files).await?;
        }

        sqlx::query("UPDATE leaks SET systems_count = $1 WHERE id = $2")
            .bind(leak.systems.len() as i32)
            .bind(leak_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(leak_id, ?stats, "leak committed");
        Ok(stats)
    }
}

#[async_trait]
impl LeakSink for PostgresLeakSink {
    async fn export_leak(&self, leak: &Leak) -> Result<ExportStats, SiftError> {
        with_retry("export_leak", || self.export_once(leak)).await
    }
}

async fn insert_system(
    tx: &mut Transaction<'_, Postgres>,
    leak_id: i64,
    system: &System,
) -> Result<i64, SiftError> {
    sqlx::query_scalar(
        "INSERT INTO systems (
            leak_id, machine_id, computer_name, hardware_id,
            machine_user, ip_address, country, log_date
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
    )
    .bind(leak_id)
    .bind(clip_opt(&system.machine_id, 255))
    .bind(clip_opt(&system.computer_name, 255))
    .bind(clip_opt(&system.hardware_id, 255))
    .bind(clip_opt(&system.machine_user, 255))
    .bind(clip_opt(&system.ip_address, 255))
    .bind(clip_opt(&system.country, 10))
    .bind(clip_opt(&system.log_date, 255))
    .fetch_one(&mut **tx)
    .await
    .map_err(map_sqlx_error)
}

async fn insert_credentials(
    tx: &mut Transaction<'_, Postgres>,
    system_id: i64,
    credentials: &[Credential],
) -> Result<u64, SiftError> {
    for chunk in credentials.chunks(INSERT_CHUNK) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO credentials (
                system_id, software, host, username, password,
                domain, local_part, email_domain, filepath, stealer_name
            ) ",
        );
        builder.push_values(chunk, |mut row, cred| {
            row.push_bind(system_id)
                .push_bind(clip_opt(&cred.software, 255))
                .push_bind(clip_opt(&cred.host, 2000))
                .push_bind(clip_opt(&cred.username, 1000))
                .push_bind(clip_opt(&cred.password, 2000))
                .push_bind(clip_opt(&cred.domain, 255))
                .push_bind(clip_opt(&cred.local_part, 255))
                .push_bind(clip_opt(&cred.email_domain, 255))
                .push_bind(clip(&cred.filepath, 2000))
                .push_bind(clip_opt(&cred.stealer_name, 50));
        });
        builder
            .build()
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;
    }
    Ok(credentials.len() as u64)
}

async fn insert_cookies(
    tx: &mut Transaction<'_, Postgres>,
    system_id: i64,
    cookies: &[Cookie],
) -> Result<u64, SiftError> {
    for chunk in cookies.chunks(INSERT_CHUNK) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO cookies (
                system_id, domain, domain_specified, path, secure, expiry,
                name, value, browser, profile, filepath, stealer_name
            ) ",
        );
        builder.push_values(chunk, |mut row, cookie| {
            row.push_bind(system_id)
                .push_bind(clip(&cookie.domain, 255))
                .push_bind(jar_bool(cookie.domain_specified))
                .push_bind(clip(&cookie.path, 2000))
                .push_bind(jar_bool(cookie.secure))
                .push_bind(cookie.expiry)
                .push_bind(clip(&cookie.name, 255))
                .push_bind(clip(&cookie.value, 2000))
                .push_bind(clip(&cookie.browser, 100))
                .push_bind(clip(&cookie.profile, 255))
                .push_bind(clip(&cookie.filepath, 2000))
                .push_bind(clip_opt(&cookie.stealer_name, 50));
        });
        builder
            .build()
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;
    }
    Ok(cookies.len() as u64)
}

async fn insert_vaults(
    tx: &mut Transaction<'_, Postgres>,
    system_id: i64,
    vaults: &[Vault],
) -> Result<u64, SiftError> {
    for chunk in vaults.chunks(INSERT_CHUNK) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO vaults (
                system_id, vault_type, title, url, username, password, notes,
                vault_data, key_phrase, seed_words, browser, profile,
                filepath, stealer_name
            ) ",
        );
        builder.push_values(chunk, |mut row, vault| {
            row.push_bind(system_id)
                .push_bind(vault.vault_type.as_str())
                .push_bind(clip_opt(&vault.title, 255))
                .push_bind(clip_opt(&vault.url, 255))
                .push_bind(clip_opt(&vault.username, 255))
                .push_bind(clip_opt(&vault.password, 2000))
                .push_bind(clip_opt(&vault.notes, 2000))
                .push_bind(clip_opt(&vault.vault_data, 4096))
                .push_bind(clip_opt(&vault.key_phrase, 2000))
                .push_bind(clip_opt(&vault.seed_words, 2000))
                .push_bind(clip(&vault.browser, 100))
                .push_bind(clip(&vault.profile, 255))
                .push_bind(clip(&vault.filepath, 2000))
                .push_bind(clip_opt(&vault.stealer_name, 50));
        });
        builder
            .build()
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;
    }
    Ok(vaults.len() as u64)
}

async fn insert_user_files(
    tx: &mut Transaction<'_, Postgres>,
    system_id: i64,
    user_files: &[UserFile],
) -> Result<u64, SiftError> {
    for chunk in user_files.chunks(INSERT_CHUNK) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO user_files (
                system_id, file_path, file_size, target_hits,
                detected_patterns, stealer_name
            ) ",
        );
        builder.push_values(chunk, |mut row, user_file| {
            row.push_bind(system_id)
                .push_bind(clip(&user_file.file_path, 2000))
                .push_bind(user_file.file_size)
                .push_bind(user_file.target_hits.map(|hits| hits as i32))
                .push_bind(clip_opt(&user_file.detected_patterns, 2000))
                .push_bind(clip_opt(&user_file.stealer_name, 50));
        });
        builder
            .build()
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;
    }
    Ok(user_files.len() as u64)
}

/// Classify a sqlx error for the retry loop: I/O and pool failures plus
/// SQLSTATE classes 08 (connection exception) and 57P (server shutdown)
/// are transient; everything else is a hard database error.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> SiftError {
    match &err {
        sqlx::Error::Io(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => SiftError::connection_error(err.to_string()),
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                if code.starts_with("08") || code.starts_with("57P") {
                    return SiftError::connection_error(db_err.to_string());
                }
            }
            SiftError::database_error(db_err.to_string())
        }
        _ => SiftError::database_error(err.to_string()),
    }
}

/// Clip to `max` characters; clipped values end in `...`.
fn clip(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let kept: String = value.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn clip_opt(value: &Option<String>, max: usize) -> Option<String> {
    value.as_deref().map(|v| clip(v, max))
}

fn jar_bool(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}
