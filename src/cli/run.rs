//! Dispatches to the command handler selected on the command line.
//!
//! A handler returns `Ok(ExitStatus)` describing how the command finished, or
//! `Err` if it fails outright (e.g. an unreadable or invalid config).

use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{generate::generate, init::init},
    exit_status::ExitStatus,
};

pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Generate(cmd)) => generate(cmd),
        Some(Command::Init) => init(),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
