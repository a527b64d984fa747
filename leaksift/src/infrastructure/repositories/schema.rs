// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Sink Schema
//!
//! DDL for the six sink tables. Foreign keys cascade downward so deleting
//! a leak removes everything it owned; child tables are indexed on their
//! parent key because the read side is dominated by per-system lookups.
//!
//! `create_schema` is idempotent; `recreate_schema` drops first and exists
//! for the `db_create_schema` startup flag and for test databases.

use sqlx::PgPool;

use leaksift_domain::error::SiftError;

use super::postgres::map_sqlx_error;

/// Idempotent DDL for the sink tables, statement per element.
const CREATE_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS leaks (
        id            BIGSERIAL PRIMARY KEY,
        filename      TEXT NOT NULL,
        systems_count INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS systems (
        id            BIGSERIAL PRIMARY KEY,
        leak_id       BIGINT NOT NULL REFERENCES leaks(id) ON DELETE CASCADE,
        machine_id    VARCHAR(255),
        computer_name VARCHAR(255),
        hardware_id   VARCHAR(255),
        machine_user  VARCHAR(255),
        ip_address    VARCHAR(255),
        country       VARCHAR(10),
        log_date      VARCHAR(255)
    )",
    "CREATE TABLE IF NOT EXISTS credentials (
        id           BIGSERIAL PRIMARY KEY,
        system_id    BIGINT NOT NULL REFERENCES systems(id) ON DELETE CASCADE,
        software     VARCHAR(255),
        host         TEXT,
        username     VARCHAR(1000),
        password     TEXT,
        domain       VARCHAR(255),
        local_part   VARCHAR(255),
        email_domain VARCHAR(255),
        filepath     TEXT,
        stealer_name VARCHAR(50)
    )",
    "CREATE TABLE IF NOT EXISTS cookies (
        id               BIGSERIAL PRIMARY KEY,
        system_id        BIGINT NOT NULL REFERENCES systems(id) ON DELETE CASCADE,
        domain           VARCHAR(255),
        domain_specified VARCHAR(10),
        path             TEXT,
        secure           VARCHAR(10),
        expiry           BIGINT,
        name             VARCHAR(255),
        value            TEXT,
        browser          VARCHAR(100),
        profile          VARCHAR(255),
        filepath         TEXT,
        stealer_name     VARCHAR(50)
    )",
    "CREATE TABLE IF NOT EXISTS vaults (
        id           BIGSERIAL PRIMARY KEY,
        system_id    BIGINT NOT NULL REFERENCES systems(id) ON DELETE CASCADE,
        vault_type   VARCHAR(50),
        title        VARCHAR(255),
        url          VARCHAR(255),
        username     VARCHAR(255),
        password     TEXT,
        notes        TEXT,
        vault_data   TEXT,
        key_phrase   TEXT,
        seed_words   TEXT,
        browser      VARCHAR(100),
        profile      VARCHAR(255),
        filepath     TEXT,
        stealer_name VARCHAR(50)
    )",
    "CREATE TABLE IF NOT EXISTS user_files (
        id                BIGSERIAL PRIMARY KEY,
        system_id         BIGINT NOT NULL REFERENCES systems(id) ON DELETE CASCADE,
        file_path         TEXT,
        file_size         BIGINT,
        target_hits       INTEGER,
        detected_patterns TEXT,
        stealer_name      VARCHAR(50)
    )",
    "CREATE INDEX IF NOT EXISTS idx_systems_leak_id ON systems(leak_id)",
    "CREATE INDEX IF NOT EXISTS idx_credentials_system_id ON credentials(system_id)",
    "CREATE INDEX IF NOT EXISTS idx_cookies_system_id ON cookies(system_id)",
    "CREATE INDEX IF NOT EXISTS idx_vaults_system_id ON vaults(system_id)",
    "CREATE INDEX IF NOT EXISTS idx_user_files_system_id ON user_files(system_id)",
];

const DROP_STATEMENTS: &[&str] = &[
    "DROP TABLE IF EXISTS user_files CASCADE",
    "DROP TABLE IF EXISTS vaults CASCADE",
    "DROP TABLE IF EXISTS cookies CASCADE",
    "DROP TABLE IF EXISTS credentials CASCADE",
    "DROP TABLE IF EXISTS systems CASCADE",
    "DROP TABLE IF EXISTS leaks CASCADE",
];

/// Create the sink tables if they do not exist.
pub async fn create_schema(pool: &PgPool) -> Result<(), SiftError> {
    for statement in CREATE_STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(map_sqlx_error)?;
    }
    Ok(())
}

/// Drop and recreate the sink tables.
pub async fn recreate_schema(pool: &PgPool) -> Result<(), SiftError> {
    for statement in DROP_STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(map_sqlx_error)?;
    }
    create_schema(pool).await
}
