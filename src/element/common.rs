use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus},
};

use which::which;

use crate::conversion_error::ConversionError;

pub fn find_command(command: &str) -> Result<PathBuf, ConversionError> {
    which(command).map_err(|error| ConversionError::CommandNotFound {
        command: command.to_string(),
        error,
    })
}

fn check_status(
    result: std::io::Result<ExitStatus>,
    command_name: &str,
) -> Result<(), ConversionError> {
    match result {
        Ok(exit_status) => {
            if exit_status.success() {
                Ok(())
            } else {
                Err(ConversionError::CommandFailed {
                    command: command_name.to_string(),
                    status: exit_status,
                })
            }
        }
        Err(error) => Err(ConversionError::CommandCannotExecuted {
            command: command_name.to_string(),
            error,
        }),
    }
}

pub fn run_command(command: &mut Command, command_name: &str) -> Result<(), ConversionError> {
    check_status(command.status(), command_name)
}

pub fn wait_command(child: &mut Child, command_name: &str) -> Result<(), ConversionError> {
    check_status(child.wait(), command_name)
}

/// Whether the extension of a file is exactly `extension`. Case is significant.
pub fn has_extension<P: AsRef<Path>>(extension: &str, file: P) -> bool {
    match file.as_ref().extension() {
        Some(file_extension) => file_extension == extension,
        None => false,
    }
}

/// Makes a path safe to pass as an operand, so that it is not parsed as an option.
pub fn as_operand(path: &Path) -> OsString {
    if path.is_relative() && path.as_os_str().to_string_lossy().starts_with('-') {
        Path::new(".").join(path).into_os_string()
    } else {
        path.as_os_str().to_os_string()
    }
}
