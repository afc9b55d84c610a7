use std::{
    ffi::OsString,
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

use anyhow::Result;
use clap::Parser;
use flamp3::{
    element::Toolchain,
    flamp3::{normalize_arguments, Setting},
};
use tempfile::{tempdir, TempDir};
use test_context::TestContext;
use walkdir::WalkDir;

/// Writes `V<quality>` on the first line, then the decoded stream.
pub const ENCODER_SCRIPT: &str = "#!/bin/sh\n{ printf 'V%s\\n' \"$3\"; cat; } > \"$5\"\n";

/// Copies the source file to the standard output.
pub const DECODER_SCRIPT: &str = "#!/bin/sh\nexec cat \"$3\"\n";

pub const FAILING_ENCODER_SCRIPT: &str = "#!/bin/sh\ncat > /dev/null\nexit 1\n";

pub const FAILING_DECODER_SCRIPT: &str = "#!/bin/sh\nexit 2\n";

pub fn write_script(directory: &Path, name: &str, body: &str) -> Result<PathBuf> {
    let path = directory.join(name);

    fs::write(&path, body)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;

    Ok(path)
}

pub fn create_toolchain(
    directory: &Path,
    decoder_script: &str,
    encoder_script: &str,
) -> Result<Toolchain> {
    let decoder = write_script(directory, "flac", decoder_script)?;
    let encoder = write_script(directory, "lame", encoder_script)?;

    Ok(Toolchain::new(decoder, encoder))
}

/// Creates files whose contents are their own relative paths.
pub fn create_files(root: &Path, relative_paths: &[&str]) -> Result<()> {
    for relative_path in relative_paths {
        let path = root.join(relative_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, relative_path)?;
    }

    Ok(())
}

/// All files under a directory with their contents, sorted by path.
#[allow(dead_code)]
pub fn files_in(directory: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    WalkDir::new(directory)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let contents = fs::read(entry.path()).unwrap();

            (entry.into_path(), contents)
        })
        .collect()
}

/// The expected contents of an MP3 file written by [`ENCODER_SCRIPT`].
pub fn encoded(quality: &str, source_contents: &str) -> Vec<u8> {
    format!("V{quality}\n{source_contents}").into_bytes()
}

#[allow(dead_code)]
pub struct ConversionContext {
    pub workspace: TempDir,
    pub tools: TempDir,
}

#[allow(dead_code)]
impl ConversionContext {
    pub fn path(&self, relative_path: &str) -> PathBuf {
        self.workspace.path().join(relative_path)
    }

    pub fn output_directory(&self) -> PathBuf {
        self.path("out")
    }

    pub fn toolchain(&self) -> Toolchain {
        create_toolchain(self.tools.path(), DECODER_SCRIPT, ENCODER_SCRIPT).unwrap()
    }

    /// Parses a command line that writes into [`Self::output_directory`].
    pub fn setting(&self, options: &[&str], inputs: &[PathBuf]) -> Setting {
        let mut arguments: Vec<OsString> = vec!["flamp3".into(), "-out".into()];

        arguments.push(self.output_directory().into_os_string());
        arguments.extend(options.iter().map(OsString::from));
        arguments.extend(inputs.iter().map(|input| input.as_os_str().to_os_string()));

        Setting::try_parse_from(normalize_arguments(arguments)).unwrap()
    }
}

impl TestContext for ConversionContext {
    fn setup() -> Self {
        ConversionContext {
            workspace: tempdir().unwrap(),
            tools: tempdir().unwrap(),
        }
    }
}
