// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! This module has the function that called by the main function.

use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
};

use clap::Parser;
use log::{debug, info};
use thiserror::Error;

use crate::{
    conversion_error::ConversionError,
    conversion_runner::{ConversionRunner, ConversionTask, TaskOutcome},
    element::{FlacToMp3Pipeline, Toolchain},
    input_resolver, utilities,
};

/// Long options that are also accepted with a single hyphen, like `-out music`.
const SINGLE_HYPHEN_LONG_OPTIONS: &[&str] = &["out", "recursive", "quality"];

/// The struct for setting.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Convert FLAC files to MP3 files with flac and LAME."
)]
pub struct Setting {
    #[arg(
        short = 'o',
        long = "out",
        value_name = "DIRECTORY",
        default_value = "out",
        value_parser = is_output_directory_or_not_found,
        help = "A directory that MP3 files are written to."
    )]
    output_directory: PathBuf,

    #[arg(short, long, help = "Recurse into directories.")]
    recursive: bool,

    #[arg(
        short,
        long,
        value_name = "LEVEL",
        default_value = "6",
        help = "LAME VBR quality level (0=best, 9=worst)."
    )]
    quality: String,

    #[arg(
        required = true,
        value_name = "INPUT",
        help = "FLAC files, or directories containing them."
    )]
    inputs: Vec<PathBuf>,
}

impl Setting {
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    pub fn quality(&self) -> &str {
        &self.quality
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }
}

/// Error of flamp3.
#[derive(Error, Debug)]
pub enum Flamp3Error {
    #[error("A required tool is not available: {0}")]
    ToolNotFound(ConversionError),

    #[error("The directory `{0}` cannot be created: {1}")]
    DirectoryCannotBeCreated(PathBuf, io::Error),
}

#[cfg_attr(test, mockall::automock)]
trait Flamp3Runner {
    fn create_output_directory(&self, path: &Path) -> io::Result<()>;

    fn resolve_inputs(&self, inputs: &[PathBuf], recursive: bool) -> Vec<ConversionTask>;

    fn convert(&self, task: &ConversionTask) -> TaskOutcome;
}

struct Flamp3<'a> {
    conversion_runner: ConversionRunner<'a>,
}

impl Flamp3Runner for Flamp3<'_> {
    fn create_output_directory(&self, path: &Path) -> io::Result<()> {
        utilities::create_directory(path)
    }

    fn resolve_inputs(&self, inputs: &[PathBuf], recursive: bool) -> Vec<ConversionTask> {
        input_resolver::resolve_inputs(inputs, recursive)
    }

    fn convert(&self, task: &ConversionTask) -> TaskOutcome {
        self.conversion_runner.convert(task)
    }
}

fn is_output_directory_or_not_found(argument: &str) -> Result<PathBuf, String> {
    let path = Path::new(argument);

    if path.is_dir() || !path.exists() {
        Ok(path.to_path_buf())
    } else {
        Err(format!(
            r#"The output "{argument}" exists and is not a directory."#
        ))
    }
}

fn as_single_hyphen_long_option(argument: &str) -> Option<&str> {
    let option = argument.strip_prefix('-')?;

    if option.starts_with('-') {
        return None;
    }

    let name = option.split_once('=').map_or(option, |(name, _)| name);

    SINGLE_HYPHEN_LONG_OPTIONS.contains(&name).then_some(option)
}

/// Rewrites `-out`, `-recursive` and `-quality` into their double hyphen forms.
///
/// Arguments after `--` are left as they are.
pub fn normalize_arguments<I, T>(arguments: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut is_after_separator = false;

    arguments
        .into_iter()
        .map(Into::into)
        .map(|argument| {
            if is_after_separator {
                return argument;
            }

            if argument == "--" {
                is_after_separator = true;

                return argument;
            }

            argument
                .to_str()
                .and_then(as_single_hyphen_long_option)
                .map(|option| OsString::from(format!("--{option}")))
                .unwrap_or(argument)
        })
        .collect()
}

fn flamp3_on_runner<T: Flamp3Runner>(
    setting: &Setting,
    runner: T,
) -> Result<Vec<TaskOutcome>, Flamp3Error> {
    info!("Converts FLAC files.");

    debug!(
        "Output directory: {:?}, recursive: {}, quality: {}",
        &setting.output_directory, setting.recursive, setting.quality
    );

    runner
        .create_output_directory(&setting.output_directory)
        .map_err(|error| {
            Flamp3Error::DirectoryCannotBeCreated(setting.output_directory.clone(), error)
        })?;

    let tasks = runner.resolve_inputs(&setting.inputs, setting.recursive);
    let outcomes = tasks.iter().map(|task| runner.convert(task)).collect();

    info!("Completed.");

    Ok(outcomes)
}

/// Converts FLAC files to MP3 files with `flac` and `lame` found in `PATH`.
pub fn flamp3(setting: &Setting) -> Result<Vec<TaskOutcome>, Flamp3Error> {
    let toolchain = Toolchain::locate().map_err(Flamp3Error::ToolNotFound)?;

    flamp3_with_toolchain(setting, toolchain)
}

/// Converts FLAC files to MP3 files with the given decoder and encoder.
///
/// Each task is converted in order. A task that fails is reported in its [`TaskOutcome`] and
/// does not stop the others.
pub fn flamp3_with_toolchain(
    setting: &Setting,
    toolchain: Toolchain,
) -> Result<Vec<TaskOutcome>, Flamp3Error> {
    let pipeline = FlacToMp3Pipeline::new(toolchain);
    let runner = Flamp3 {
        conversion_runner: ConversionRunner::new(
            &setting.output_directory,
            &setting.quality,
            &pipeline,
        ),
    };

    flamp3_on_runner(setting, runner)
}
