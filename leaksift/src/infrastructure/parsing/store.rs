// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Definition Store
//!
//! Loads every `*.yaml`, `*.yml`, and `*.json` file under the configured
//! base directories into record definitions. Loading happens once at
//! startup; the result is frozen and shared.
//!
//! ## Failure Policy
//!
//! A single malformed definition file is a hard error carrying the file
//! path. Definitions are authored artifacts; silently dropping one would
//! quietly stop an entire file family from parsing, which corrupts the
//! corpus in a way nobody notices until much later. Missing base
//! directories, by contrast, are skipped - deployments often configure a
//! site-local directory that does not exist everywhere.
//!
//! ## Load Order
//!
//! Base directories are visited in configured order; within each, files
//! load in sorted path order. The resulting definition order is the
//! selector's tie-breaker, so it must be stable across runs and hosts.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use leaksift_domain::definitions::RecordDefinition;
use leaksift_domain::error::SiftError;

/// Loaded, compiled record definitions.
#[derive(Debug)]
pub struct DefinitionStore {
    definitions: Vec<RecordDefinition>,
}

impl DefinitionStore {
    /// Load all definitions under `base_dirs`.
    ///
    /// Every definition's pattern set is compiled here so that a bad regex
    /// or glob is a startup failure, not a mid-archive surprise.
    pub fn load(base_dirs: &[PathBuf]) -> Result<Self, SiftError> {
        let mut definitions: Vec<RecordDefinition> = Vec::new();
        for base in base_dirs {
            if !base.is_dir() {
                debug!(dir = %base.display(), "definitions directory missing, skipping");
                continue;
            }
            let mut files = Vec::new();
            collect_definition_files(base, &mut files)?;
            files.sort();
            for file in files {
                let definition = load_one(&file)?;
                if definitions.iter().any(|d| d.key == definition.key) {
                    return Err(SiftError::InvalidDefinition(format!(
                        "duplicate definition key '{}' in {}",
                        definition.key,
                        file.display()
                    )));
                }
                definitions.push(definition);
            }
        }
        debug!(count = definitions.len(), "record definitions loaded");
        Ok(Self { definitions })
    }

    /// An empty store, for configurations that run legacy parsers only.
    pub fn empty() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }

    pub fn definitions(&self) -> &[RecordDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Consume the store, yielding the definition list in load order.
    pub fn into_definitions(self) -> Vec<RecordDefinition> {
        self.definitions
    }
}

fn collect_definition_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), SiftError> {
    let entries = fs::read_dir(dir)
        .map_err(|err| SiftError::DefinitionLoad(format!("{}: {err}", dir.display())))?;
    for entry in entries {
        let entry =
            entry.map_err(|err| SiftError::DefinitionLoad(format!("{}: {err}", dir.display())))?;
        let path = entry.path();
        if path.is_dir() {
            collect_definition_files(&path, files)?;
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext, "yaml" | "yml" | "json"))
            .unwrap_or(false);
        if matches {
            files.push(path);
        }
    }
    Ok(())
}

fn load_one(file: &Path) -> Result<RecordDefinition, SiftError> {
    let error_at =
        |err: String| SiftError::DefinitionLoad(format!("{}: {err}", file.display()));

    let text = fs::read_to_string(file).map_err(|err| error_at(err.to_string()))?;
    let is_json = file
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "json")
        .unwrap_or(false);

    let definition: RecordDefinition = if is_json {
        serde_json::from_str(&text).map_err(|err| error_at(err.to_string()))?
    } else {
        serde_yaml::from_str(&text).map_err(|err| error_at(err.to_string()))?
    };

    // Compile now; a bad pattern must surface at startup.
    definition
        .patterns()
        .map_err(|err| error_at(err.to_string()))?;
    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "credential.yaml",
            "key: credential\nfile_globs: ['**/passwords*.txt']\nfields:\n  - name: username\n    header_patterns: ['^user\\s*:']\n",
        );
        write_file(
            dir.path(),
            "cookie.json",
            r#"{"key": "cookie", "multiline": false, "capabilities": ["line-based"]}"#,
        );
        let store = DefinitionStore::load(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(store.len(), 2);
        // Sorted path order: cookie.json before credential.yaml.
        assert_eq!(store.definitions()[0].key, "cookie");
        assert_eq!(store.definitions()[1].key, "credential");
    }

    #[test]
    fn test_load_recurses_into_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("extra")).unwrap();
        write_file(dir.path(), "a.yaml", "key: a\n");
        write_file(&dir.path().join("extra"), "b.yml", "key: b\n");
        let store = DefinitionStore::load(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_malformed_definition_is_hard_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "broken.yaml", "key: [unclosed\n");
        let err = DefinitionStore::load(&[dir.path().to_path_buf()]).unwrap_err();
        assert!(err.to_string().contains("broken.yaml"), "{err}");
    }

    #[test]
    fn test_bad_regex_is_hard_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "badregex.yaml", "key: bad\nrecord_separators: ['(']\n");
        let err = DefinitionStore::load(&[dir.path().to_path_buf()]).unwrap_err();
        assert!(err.to_string().contains("badregex.yaml"), "{err}");
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "one.yaml", "key: credential\n");
        write_file(dir.path(), "two.yaml", "key: credential\n");
        let err = DefinitionStore::load(&[dir.path().to_path_buf()]).unwrap_err();
        assert!(err.to_string().contains("duplicate"), "{err}");
    }

    #[test]
    fn test_missing_directory_is_skipped() {
        let store =
            DefinitionStore::load(&[PathBuf::from("/no/such/definitions/dir")]).unwrap();
        assert!(store.is_empty());
    }
}
