//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `generate`: Write annotation blocks and missing members for configured classes
//! - `init`: Initialize the vmdoc configuration file

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Actually write the documents (default is dry-run)
    #[arg(long)]
    pub apply: bool,

    /// Discard existing property and method tags before rendering
    #[arg(long, env = "VMDOC_RESET")]
    pub reset: bool,

    /// Replace existing tags that a configured member redefines
    #[arg(long, env = "VMDOC_OVERWRITE")]
    pub overwrite: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub args: GenerateArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write doc blocks describing virtual members of the configured classes
    Generate(GenerateCommand),
    /// Initialize a new .vmdocrc.json configuration file
    Init,
}
