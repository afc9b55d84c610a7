// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::{env, process::exit};

use clap::Parser;

use env_logger::Env;
use flamp3::flamp3::{flamp3, normalize_arguments, Flamp3Error, Setting};
use log::error;

fn initialize_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .format_timestamp(None)
        .init();
}

fn main() {
    initialize_logging();

    let setting = Setting::parse_from(normalize_arguments(env::args_os()));

    if let Err(error) = flamp3(&setting) {
        match error {
            Flamp3Error::ToolNotFound(error) => {
                error!("A required tool is not found in PATH. Detail: {error}");
            }
            Flamp3Error::DirectoryCannotBeCreated(directory, error) => {
                error!("{directory:?} cannot be created. Detail: {error}");
            }
        }

        exit(1);
    }
}
