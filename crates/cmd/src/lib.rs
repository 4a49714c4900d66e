// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod cli;
pub mod commands;
pub mod common;

pub use cli::{Cli, Commands};
pub use common::{Outcome, exit_code_for, open_standings};
