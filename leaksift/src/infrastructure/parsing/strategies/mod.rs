// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Built-in strategy implementations for the three parsing seams.

pub mod chunkers;
pub mod extractors;
pub mod transformers;
pub mod vault;

pub use chunkers::{FullFileChunker, LineChunker, RegexSeparatorChunker};
pub use extractors::{DelimitedLineExtractor, KvHeaderExtractor};
pub use transformers::{AliasGroupingTransformer, VaultTransformer};
pub use vault::VaultExtractor;
