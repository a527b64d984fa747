// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # LeakSift
//!
//! Definition-driven parsing engine for infostealer log archives. Turns a
//! heterogeneous pile of per-victim text files - authored by dozens of
//! stealer families with their own ad-hoc dialects - into typed records:
//! compromised systems, credentials, browser cookies, wallet vault
//! artifacts, and flagged user files.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Application Layer                          │
//! │  (Leak Processor, User-File Scanner)                        │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Domain Layer                             │
//! │  (Entities, Record Definitions, Strategy Seams, Ports)      │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Infrastructure Layer                         │
//! │  (Definition Store, Strategies, Archives, PostgreSQL Sink)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow
//!
//! The archive walker enumerates entries; the selector scores every record
//! definition against a 12 KB sample of each file; the parser factory
//! composes a (chunker, extractor, transformer) triple for the winning
//! definition; the configurable parser streams records; the leak
//! aggregator groups them under per-system identities; the sink adapter
//! flushes the whole leak in one transaction.
//!
//! Parallelism lives *between* leaks: one worker task per archive, each
//! owning its aggregator and sink connection. Within a leak everything is
//! a single sequential, CPU-bound stream.

pub mod application;
pub mod infrastructure;
