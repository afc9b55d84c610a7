// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Converts one FLAC file into its mirrored MP3 file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{error, info, warn};
use tempfile::TempPath;

use crate::{
    conversion_error::ConversionError,
    element::{self, Pipeline},
    utilities,
};

const PARTIAL_FILE_PREFIX: &str = ".flamp3-";
const PARTIAL_FILE_SUFFIX: &str = ".mp3.part";

#[cfg(unix)]
const OUTPUT_FILE_MODE: u32 = 0o644;

/// A source file and the path of its output relative to the output directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionTask {
    pub source: PathBuf,
    pub relative_output: PathBuf,
}

impl ConversionTask {
    pub fn new<S: AsRef<Path>, R: AsRef<Path>>(source: S, relative_output: R) -> Self {
        ConversionTask {
            source: source.as_ref().to_path_buf(),
            relative_output: relative_output.as_ref().to_path_buf(),
        }
    }
}

/// What happened to a task.
#[derive(Debug)]
pub enum TaskOutcome {
    Converted {
        source: PathBuf,
        destination: PathBuf,
    },

    /// The output file already existed, so nothing was done.
    AlreadyConverted {
        source: PathBuf,
        destination: PathBuf,
    },

    Failed {
        source: PathBuf,
        error: ConversionError,
    },
}

impl TaskOutcome {
    pub fn source(&self) -> &Path {
        match self {
            TaskOutcome::Converted { source, .. }
            | TaskOutcome::AlreadyConverted { source, .. }
            | TaskOutcome::Failed { source, .. } => source,
        }
    }
}

/// The final path of the MP3 file for `relative_output`.
pub fn output_path_for<R: AsRef<Path>, O: AsRef<Path>>(
    relative_output: R,
    output_directory: O,
) -> PathBuf {
    output_directory
        .as_ref()
        .join(element::to_mp3_path(relative_output))
}

pub struct ConversionRunner<'a> {
    output_directory: &'a Path,
    quality: &'a str,
    pipeline: &'a dyn Pipeline,
}

impl<'a> ConversionRunner<'a> {
    pub fn new(output_directory: &'a Path, quality: &'a str, pipeline: &'a dyn Pipeline) -> Self {
        ConversionRunner {
            output_directory,
            quality,
            pipeline,
        }
    }

    /// Converts the source file of a task unless its output already exists.
    pub fn convert(&self, task: &ConversionTask) -> TaskOutcome {
        let source = task.source.clone();
        let destination = output_path_for(&task.relative_output, self.output_directory);

        match fs::metadata(&destination) {
            Ok(_) => {
                info!(
                    "Skipping {}: output already exists at {}",
                    source.display(),
                    destination.display()
                );

                return TaskOutcome::AlreadyConverted {
                    source,
                    destination,
                };
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => warn!("Error checking {}: {error}", destination.display()),
        }

        let parent = parent_directory(&destination);

        if let Err(error) = utilities::create_directory(parent) {
            error!(
                "Failed to create directory for {}: {error}",
                destination.display()
            );

            return TaskOutcome::Failed {
                source,
                error: ConversionError::DirectoryCannotBeCreated {
                    path: parent.to_path_buf(),
                    error,
                },
            };
        }

        match self.convert_to(&source, &destination) {
            Ok(()) => {
                info!("Converted {} -> {}", source.display(), destination.display());

                TaskOutcome::Converted {
                    source,
                    destination,
                }
            }
            Err(error) => {
                error!("Conversion failed for {}: {error}", source.display());

                TaskOutcome::Failed { source, error }
            }
        }
    }

    // The encoder writes next to the destination and the result is renamed into place only when
    // the whole pipeline succeeded. A dropped partial file is deleted.
    fn convert_to(&self, source: &Path, destination: &Path) -> Result<(), ConversionError> {
        let partial_file = create_partial_file(parent_directory(destination))?;

        self.pipeline.run(source, &partial_file, self.quality)?;

        partial_file
            .persist_noclobber(destination)
            .map_err(|error| ConversionError::IoError { error: error.error })
    }
}

fn parent_directory(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}

// The umask still applies on creation, as it does for a file the encoder creates itself.
fn create_partial_file(directory: &Path) -> Result<TempPath, ConversionError> {
    let mut builder = tempfile::Builder::new();

    builder.prefix(PARTIAL_FILE_PREFIX).suffix(PARTIAL_FILE_SUFFIX);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        builder.permissions(fs::Permissions::from_mode(OUTPUT_FILE_MODE));
    }

    builder
        .tempfile_in(directory)
        .map(|file| file.into_temp_path())
        .map_err(|error| ConversionError::IoError { error })
}
