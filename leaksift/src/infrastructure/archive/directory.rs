// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Directory Archive
//!
//! Treats an unpacked directory tree as a leak container. Entry names are
//! POSIX-style paths relative to the root, listed in sorted order so that
//! repeated runs walk identically; directories appear as `name/` markers,
//! matching what zip readers emit.

use std::fs;
use std::path::{Path, PathBuf};

use leaksift_domain::error::SiftError;
use leaksift_domain::services::{normalize_entry_text, Archive};

/// Archive over an unpacked directory tree.
pub struct DirectoryArchive {
    root: PathBuf,
    filename: String,
    closed: bool,
}

impl DirectoryArchive {
    /// Open a directory as an archive.
    ///
    /// # Errors
    ///
    /// `SiftError::ArchiveError` when the path is not a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SiftError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(SiftError::archive_error(format!(
                "not a directory: {}",
                root.display()
            )));
        }
        let filename = root.to_string_lossy().into_owned();
        Ok(Self {
            root,
            filename,
            closed: false,
        })
    }

    fn walk(&self, dir: &Path, entries: &mut Vec<String>) {
        let Ok(read_dir) = fs::read_dir(dir) else {
            return;
        };
        let mut children: Vec<PathBuf> = read_dir.flatten().map(|entry| entry.path()).collect();
        children.sort();
        for child in children {
            let Ok(relative) = child.strip_prefix(&self.root) else {
                continue;
            };
            let name = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if child.is_dir() {
                entries.push(format!("{name}/"));
                self.walk(&child, entries);
            } else {
                entries.push(name);
            }
        }
    }
}

impl Archive for DirectoryArchive {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn entries(&self) -> Vec<String> {
        let mut entries = Vec::new();
        if !self.closed {
            self.walk(&self.root, &mut entries);
        }
        entries
    }

    fn read(&self, path: &str) -> Result<String, SiftError> {
        if self.closed {
            return Err(SiftError::archive_error("archive is closed"));
        }
        // Entry names come from enumeration, but stay defensive about
        // traversal when callers pass arbitrary paths.
        if path.split('/').any(|segment| segment == "..") {
            return Err(SiftError::archive_error(format!("invalid entry name: {path}")));
        }
        let full = self.root.join(path);
        if !full.is_file() {
            return Err(SiftError::archive_error(format!("no such entry: {path}")));
        }
        let bytes = fs::read(&full)
            .map_err(|err| SiftError::archive_error(format!("{path}: {err}")))?;
        Ok(normalize_entry_text(&bytes))
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
