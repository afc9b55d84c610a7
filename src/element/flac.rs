use std::{
    path::Path,
    process::{Child, Command, Stdio},
};

use crate::conversion_error::ConversionError;

use super::common;

pub const COMMAND_NAME: &str = "flac";

const FLAC_EXTENSION: &str = "flac";

pub fn is_flac<P: AsRef<Path>>(file: P) -> bool {
    common::has_extension(FLAC_EXTENSION, file)
}

/// Starts decoding a FLAC file to the standard output of the returned child.
pub fn spawn_decoder(decoder: &Path, source_file: &Path) -> Result<Child, ConversionError> {
    Command::new(decoder)
        .arg("-c")
        .arg("-d")
        .arg(common::as_operand(source_file))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|error| ConversionError::CommandCannotExecuted {
            command: COMMAND_NAME.to_string(),
            error,
        })
}
