// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Elements that drive the external decoder and encoder.

mod common;
mod flac;
mod lame;

use std::{
    path::{Path, PathBuf},
    process::{Child, Stdio},
};

use log::debug;

use crate::conversion_error::ConversionError;

pub use self::{flac::is_flac, lame::to_mp3_path};

/// Converts a source file into an MP3 file.
#[cfg_attr(test, mockall::automock)]
pub trait Pipeline {
    fn run(
        &self,
        source_file: &Path,
        destination_file: &Path,
        quality: &str,
    ) -> Result<(), ConversionError>;
}

/// Locations of the external executables.
#[derive(Clone, Debug)]
pub struct Toolchain {
    decoder: PathBuf,
    encoder: PathBuf,
}

impl Toolchain {
    pub fn new<D: AsRef<Path>, E: AsRef<Path>>(decoder: D, encoder: E) -> Self {
        Toolchain {
            decoder: decoder.as_ref().to_path_buf(),
            encoder: encoder.as_ref().to_path_buf(),
        }
    }

    /// Finds `flac` and `lame` in `PATH`.
    pub fn locate() -> Result<Self, ConversionError> {
        let decoder = common::find_command(flac::COMMAND_NAME)?;
        let encoder = common::find_command(lame::COMMAND_NAME)?;

        debug!("Decoder: {decoder:?}, encoder: {encoder:?}");

        Ok(Toolchain::new(decoder, encoder))
    }

    pub fn decoder(&self) -> &Path {
        &self.decoder
    }

    pub fn encoder(&self) -> &Path {
        &self.encoder
    }
}

/// `flac -c -d` piped into `lame --vbr-new`.
///
/// The decoded stream goes straight from one process to the other, so no intermediate file is
/// written.
pub struct FlacToMp3Pipeline {
    toolchain: Toolchain,
}

impl FlacToMp3Pipeline {
    pub fn new(toolchain: Toolchain) -> Self {
        FlacToMp3Pipeline { toolchain }
    }
}

impl Pipeline for FlacToMp3Pipeline {
    fn run(
        &self,
        source_file: &Path,
        destination_file: &Path,
        quality: &str,
    ) -> Result<(), ConversionError> {
        let mut decoder = flac::spawn_decoder(self.toolchain.decoder(), source_file)?;

        let Some(decoded) = decoder.stdout.take() else {
            stop_decoder(&mut decoder);

            if let Err(error) = decoder.wait() {
                debug!("Decoder could not be waited for: {error}");
            }

            return Err(ConversionError::StreamUnavailable {
                command: flac::COMMAND_NAME.to_string(),
            });
        };

        let encoded = lame::encode_stream(
            self.toolchain.encoder(),
            Stdio::from(decoded),
            quality,
            destination_file,
        );

        if encoded.is_err() {
            stop_decoder(&mut decoder);
        }

        let decoded = common::wait_command(&mut decoder, flac::COMMAND_NAME);

        encoded.and(decoded)
    }
}

// The decoder may already have exited, so a failure here is not an error.
fn stop_decoder(decoder: &mut Child) {
    if let Err(error) = decoder.kill() {
        debug!("Decoder could not be killed: {error}");
    }
}
