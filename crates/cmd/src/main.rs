// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use clap::Parser;
use cmd::commands::run_command;
use cmd::common::{EXIT_NO_DATA, parse_exit_code};
use cmd::{Cli, Outcome, exit_code_for, open_standings};
use diagnostics::*;

fn main() -> ExitCode {
    diagnostics::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = parse_exit_code(&err);
            if err.print().is_err() {
                eprintln!("{err}");
            }
            return ExitCode::from(code);
        }
    };

    let result = open_standings(cli.config)
        .and_then(|standings| run_command(&standings, cli.command, |output| println!("{output}")));

    match result {
        Ok(Outcome::Found) => ExitCode::SUCCESS,
        Ok(Outcome::NoData(message)) => {
            eprintln!("{message}");
            ExitCode::from(EXIT_NO_DATA)
        }
        Err(err) => {
            let message = format!("{err:#}");
            error!("Command failed: {message}", message: message.as_str());
            eprintln!("Error: {message}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}
