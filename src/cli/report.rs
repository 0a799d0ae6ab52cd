//! Console output for the CLI.
//!
//! Progress notifications from the generator and per-class results go through
//! the `*_to` functions so they can be captured in tests.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::GenerateSummary;
use crate::generator::{Outcome, Output};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Generator output sink printing to the terminal.
///
/// Progress comments only appear in verbose mode.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleOutput {
    verbose: bool,
}

impl ConsoleOutput {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Output for ConsoleOutput {
    fn comment(&self, message: &str) {
        if self.verbose {
            eprintln!("{}", message.dimmed());
        }
    }

    fn info(&self, message: &str) {
        println!("{} {}", SUCCESS_MARK.green(), message.green());
    }
}

/// Print the result of one class run.
///
/// Written documents are already announced by [`ConsoleOutput::info`].
pub fn print_outcome(class: &str, result: &anyhow::Result<Outcome>, verbose: bool) {
    print_outcome_to(class, result, verbose, &mut io::stdout().lock());
}

pub fn print_outcome_to<W: Write>(
    class: &str,
    result: &anyhow::Result<Outcome>,
    verbose: bool,
    writer: &mut W,
) {
    match result {
        Ok(Outcome::Pending { path, contents }) => {
            let _ = writeln!(
                writer,
                "{} {} ({})",
                "Would update".yellow().bold(),
                path.display(),
                class
            );
            if verbose {
                let _ = writeln!(writer, "{}", contents.dimmed());
            }
        }
        Ok(Outcome::WriteFailed { path, reason }) => {
            let _ = writeln!(
                writer,
                "{} {}",
                FAILURE_MARK.red(),
                format!("Failed to write {}: {}", path.display(), reason).red()
            );
        }
        Ok(Outcome::Skipped) if verbose => {
            let _ = writeln!(
                writer,
                "{}",
                format!("Skipped {} (not instantiable)", class).dimmed()
            );
        }
        Ok(Outcome::Unchanged { path }) if verbose => {
            let _ = writeln!(
                writer,
                "{}",
                format!("Unchanged {} ({})", path.display(), class).dimmed()
            );
        }
        Ok(_) => {}
        Err(err) => {
            let _ = writeln!(writer, "{} {}: {:#}", "error:".bold().red(), class, err);
        }
    }
}

/// Print the final summary line(s).
pub fn print_summary(summary: &GenerateSummary) {
    print_summary_to(summary, &mut io::stdout().lock());
}

pub fn print_summary_to<W: Write>(summary: &GenerateSummary, writer: &mut W) {
    if summary.failed > 0 || summary.errors > 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!(
                "{} class(es) failed, {} write(s) failed",
                summary.errors, summary.failed
            )
            .red()
        );
    }

    if summary.is_apply {
        if summary.written > 0 {
            let _ = writeln!(
                writer,
                "{} {} file(s) for {} class(es)",
                "Updated".green().bold(),
                summary.files,
                summary.written
            );
        }
    } else if summary.pending > 0 {
        let _ = writeln!(
            writer,
            "{} {} file(s) for {} class(es).",
            "Would update".yellow().bold(),
            summary.files,
            summary.pending
        );
        let _ = writeln!(writer, "Run with {} to write these changes.", "--apply".cyan());
    }

    if summary.written == 0 && summary.pending == 0 && summary.failed == 0 && summary.errors == 0
    {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} {} - everything up to date",
                summary.total,
                if summary.total == 1 { "class" } else { "classes" }
            )
            .green()
        );
    }

    if summary.skipped > 0 {
        let _ = writeln!(
            writer,
            "{} {} class(es) skipped (abstract, interface, trait or enum)",
            "note:".bold(),
            summary.skipped
        );
    }
}
