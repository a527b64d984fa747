// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Declarative record definitions and their compiled pattern sets.

pub mod definition;

pub use definition::{
    clean_value, Capability, CompiledDefinition, DataType, FieldDef, RecordDefinition,
    ScoreWeights,
};
