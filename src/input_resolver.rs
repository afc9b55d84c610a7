// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Turns the paths given on the command line into conversion tasks.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::{conversion_runner::ConversionTask, element};

/// Resolves files and directories into tasks, in the order they are given.
///
/// Inputs that cannot be used are reported and skipped. Directories are walked only when
/// `recursive` is set.
pub fn resolve_inputs<P: AsRef<Path>>(inputs: &[P], recursive: bool) -> Vec<ConversionTask> {
    let mut tasks = Vec::new();

    for input in inputs {
        resolve_input(input.as_ref(), recursive, &mut tasks);
    }

    tasks
}

fn resolve_input(input: &Path, recursive: bool, tasks: &mut Vec<ConversionTask>) {
    let metadata = match fs::metadata(input) {
        Ok(metadata) => metadata,
        Err(error) => {
            warn!("Skipping {}: {error}", input.display());

            return;
        }
    };

    if !metadata.is_dir() {
        tasks.extend(resolve_file(input));
    } else if recursive {
        tasks.extend(resolve_directory(input));
    } else {
        warn!("Skipping directory {} (use --recursive)", input.display());
    }
}

fn resolve_file(file: &Path) -> Option<ConversionTask> {
    if !element::is_flac(file) {
        warn!("Skipping non-FLAC file {}", file.display());

        return None;
    }

    let relative_output = file.file_name().map(PathBuf::from).unwrap_or_default();

    Some(ConversionTask::new(file, relative_output))
}

fn resolve_directory(directory: &Path) -> Vec<ConversionTask> {
    let base_name = directory_base_name(directory);

    debug!("Walking {} into {}", directory.display(), base_name.display());

    let mut tasks = Vec::new();

    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                let path = error.path().unwrap_or(directory);

                warn!("Error reading {}: {error}", path.display());

                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();

        if !element::is_flac(path) {
            debug!("Ignoring {}", path.display());

            continue;
        }

        match path.strip_prefix(directory) {
            Ok(relative_path) => {
                tasks.push(ConversionTask::new(path, base_name.join(relative_path)))
            }
            Err(error) => warn!("Skipping {}: {error}", path.display()),
        }
    }

    tasks
}

// Files under `.` go directly under the output directory. A directory ending in `..` is named
// after the directory it resolves to, so that its files stay inside the output directory.
fn directory_base_name(directory: &Path) -> PathBuf {
    if let Some(name) = directory.file_name() {
        return PathBuf::from(name);
    }

    if let Some(Component::CurDir) = directory.components().next_back() {
        return PathBuf::new();
    }

    directory
        .canonicalize()
        .ok()
        .and_then(|path| path.file_name().map(PathBuf::from))
        .unwrap_or_default()
}
