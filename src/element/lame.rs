use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::conversion_error::ConversionError;

use super::common;

pub const COMMAND_NAME: &str = "lame";

const MP3_EXTENSION: &str = "mp3";

/// Replaces the extension of a path with the MP3 one.
pub fn to_mp3_path<P: AsRef<Path>>(path: P) -> PathBuf {
    path.as_ref().with_extension(MP3_EXTENSION)
}

/// Encodes a raw audio stream read from `stream` into an MP3 file in VBR mode.
pub fn encode_stream(
    encoder: &Path,
    stream: Stdio,
    quality: &str,
    destination_file: &Path,
) -> Result<(), ConversionError> {
    let mut lame = Command::new(encoder);
    let command = lame
        .arg("--vbr-new")
        .arg("-V")
        .arg(quality)
        .arg("-")
        .arg(common::as_operand(destination_file))
        .stdin(stream)
        .stderr(Stdio::inherit());

    common::run_command(command, COMMAND_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mp3_path_from_flac() {
        assert_eq!(
            PathBuf::from("album/disc1/song.mp3"),
            to_mp3_path("album/disc1/song.flac")
        );
    }

    #[test]
    fn mp3_path_with_embedded_dots() {
        assert_eq!(
            PathBuf::from("v1.2/01. intro.live.mp3"),
            to_mp3_path("v1.2/01. intro.live.flac")
        );
    }

    #[test]
    fn mp3_path_without_extension() {
        assert_eq!(PathBuf::from("song.mp3"), to_mp3_path("song"));
    }
}
