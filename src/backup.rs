// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Timestamped backups of the export directory.

use crate::error::StorageError;
use chrono::NaiveDateTime;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Outcome of one backup run.
#[derive(Debug)]
pub struct BackupReport {
    /// Directory the files were copied into.
    pub target: PathBuf,
    pub files_copied: usize,
    pub failures: Vec<(PathBuf, StorageError)>,
    /// Total bytes under `target` after the copy.
    pub size_bytes: u64,
}

impl BackupReport {
    pub fn size_kib(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

/// Directory name for a backup taken at `now`: `backup_YYYY-MM-DD_HH-MM-SS`.
pub fn backup_dir_name(now: NaiveDateTime) -> String {
    format!("backup_{}", now.format(TIMESTAMP_FORMAT))
}

/// Copies every regular file under `source` into a new timestamped
/// directory inside `backup_root`, keeping relative paths.
///
/// Symbolic links to files are copied as files. Links to directories are
/// not followed, and the new backup directory is never copied into itself
/// when `backup_root` lies inside `source`.
///
/// # Errors
///
/// - [`StorageError::MissingSource`] - `source` does not exist.
/// - [`StorageError::Io`] - The target directory cannot be created or
///   `source` cannot be listed.
///
/// A file that fails to copy is logged and recorded in
/// [`BackupReport::failures`]; the remaining files are still copied.
pub fn create_backup(
    source: &Path,
    backup_root: &Path,
    now: NaiveDateTime,
) -> Result<BackupReport, StorageError> {
    if !source.is_dir() {
        return Err(StorageError::MissingSource(source.to_path_buf()));
    }

    let target = backup_root.join(backup_dir_name(now));
    fs::create_dir_all(&target)?;
    let skip = fs::canonicalize(&target)?;

    let mut report = BackupReport {
        target: target.clone(),
        files_copied: 0,
        failures: Vec::new(),
        size_bytes: 0,
    };
    copy_tree(source, &target, &skip, &mut report)?;

    report.size_bytes = directory_size(&report.target);
    info!(
        "backup created at {} ({} files, {:.2} KB)",
        report.target.display(),
        report.files_copied,
        report.size_kib()
    );
    Ok(report)
}

fn copy_tree(
    from: &Path,
    to: &Path,
    skip: &Path,
    report: &mut BackupReport,
) -> Result<(), StorageError> {
    for entry in fs::read_dir(from)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("failed to read entry in {}: {}", from.display(), e);
                report.failures.push((from.to_path_buf(), e.into()));
                continue;
            }
        };
        let path = entry.path();
        let destination = to.join(entry.file_name());

        // `DirEntry::file_type` does not follow symbolic links.
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!("failed to inspect {}: {}", path.display(), e);
                report.failures.push((path, e.into()));
                continue;
            }
        };

        if file_type.is_dir() {
            if fs::canonicalize(&path).is_ok_and(|resolved| resolved.as_path() == skip) {
                continue;
            }
            let nested = fs::create_dir_all(&destination)
                .map_err(StorageError::from)
                .and_then(|()| copy_tree(&path, &destination, skip, report));
            if let Err(e) = nested {
                warn!("failed to copy directory {}: {}", path.display(), e);
                report.failures.push((path, e));
            }
        } else if file_type.is_file() {
            copy_file(path, &destination, report);
        } else if file_type.is_symlink() {
            match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => copy_file(path, &destination, report),
                Ok(_) => warn!("not following directory link {}", path.display()),
                Err(e) => {
                    warn!("broken link {}: {}", path.display(), e);
                    report.failures.push((path, e.into()));
                }
            }
        }
    }
    Ok(())
}

fn copy_file(path: PathBuf, destination: &Path, report: &mut BackupReport) {
    match fs::copy(&path, destination) {
        Ok(_) => report.files_copied += 1,
        Err(e) => {
            warn!("failed to copy file {}: {}", path.display(), e);
            report.failures.push((path, e.into()));
        }
    }
}

/// Recursive byte size of all files under `dir`. Unreadable entries count as zero.
///
/// Symbolic links are counted by their own size and never followed.
pub fn directory_size(dir: &Path) -> u64 {
    let Ok(entries) = fs::read_dir(dir) else {
        warn!("could not access {} to calculate size", dir.display());
        return 0;
    };

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let path = entry.path();
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                directory_size(&path)
            } else {
                entry.metadata().map(|m| m.len()).unwrap_or_else(|e| {
                    warn!("could not access {} to calculate size: {}", path.display(), e);
                    0
                })
            }
        })
        .sum()
}
