// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

pub mod conversion_error;
pub mod conversion_runner;
pub mod element;
pub mod flamp3;
pub mod input_resolver;
pub mod utilities;

#[cfg(test)]
mod test_logging;
