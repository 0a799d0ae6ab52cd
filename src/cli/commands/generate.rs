//! The `generate` command: run the generator for every configured class.
//!
//! Classes are grouped by the document they resolve to. Groups run in
//! parallel, and the classes of one group run in order so that each sees the
//! document its predecessor wrote.

use std::{
    collections::{HashMap, HashSet},
    env,
    path::{Path, PathBuf},
};

use anyhow::Result;
use colored::Colorize;
use rayon::prelude::*;

use super::super::args::GenerateCommand;
use super::super::exit_status::ExitStatus;
use super::super::report::{ConsoleOutput, print_outcome, print_summary};
use crate::{
    config::{CONFIG_FILE_NAME, ClassTarget, load_config},
    entries::Entries,
    generator::{GenerateOptions, Generator, Handle, Outcome},
    reflect::{ClassSnapshot, Reflector, SourceReflector},
};

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    pub total: usize,
    pub written: usize,
    pub pending: usize,
    pub unchanged: usize,
    pub skipped: usize,
    /// Documents that could not be written.
    pub failed: usize,
    /// Classes that could not be resolved.
    pub errors: usize,
    /// Distinct files written (or that would be written).
    pub files: usize,
    pub is_apply: bool,
}

impl GenerateSummary {
    pub fn exit_status(&self) -> ExitStatus {
        if self.errors > 0 || self.failed > 0 {
            ExitStatus::Error
        } else if !self.is_apply && self.pending > 0 {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}

/// Populates entries from a configured target.
struct TargetHandler<'t> {
    target: &'t ClassTarget,
}

impl Handle for TargetHandler<'_> {
    fn handle(&mut self, _class: &ClassSnapshot, entries: &mut Entries) {
        self.target.register(entries);
    }
}

pub fn generate(cmd: GenerateCommand) -> Result<ExitStatus> {
    let args = &cmd.args;
    let cwd = env::current_dir()?;
    let loaded = load_config(&cwd)?;

    if loaded.path.is_none() {
        eprintln!(
            "{} no {} found, run {} to create one",
            "warning:".bold().yellow(),
            CONFIG_FILE_NAME,
            "vmdoc init".cyan()
        );
    }

    let base_dir = loaded.base_dir(&cwd);
    let config = &loaded.config;
    let reflector = config.reflector(&base_dir);
    let options = GenerateOptions {
        reset: args.reset || config.reset,
        overwrite: args.overwrite || config.overwrite,
        dry_run: !args.apply,
    };
    let output = ConsoleOutput::new(args.verbose);
    let (reflector, output) = (&reflector, &output);

    let results: Vec<(&ClassTarget, Result<Outcome>)> = group_by_file(&config.classes, reflector)
        .par_iter()
        .flat_map_iter(|group| {
            group
                .iter()
                .map(move |target| (*target, run_target(target, reflector, options, output)))
        })
        .collect();

    let mut summary = GenerateSummary {
        total: results.len(),
        is_apply: args.apply,
        ..Default::default()
    };
    let mut files: HashSet<PathBuf> = HashSet::new();

    for (target, result) in &results {
        print_outcome(&target.class, result, args.verbose);
        match result {
            Ok(Outcome::Skipped) => summary.skipped += 1,
            Ok(Outcome::Unchanged { .. }) => summary.unchanged += 1,
            Ok(Outcome::Pending { path, .. }) => {
                summary.pending += 1;
                files.insert(path.clone());
            }
            Ok(Outcome::Written { path }) => {
                summary.written += 1;
                files.insert(path.clone());
            }
            Ok(Outcome::WriteFailed { .. }) => summary.failed += 1,
            Err(_) => summary.errors += 1,
        }
    }
    summary.files = files.len();

    print_summary(&summary);
    Ok(summary.exit_status())
}

fn run_target(
    target: &ClassTarget,
    reflector: &dyn Reflector,
    options: GenerateOptions,
    output: &ConsoleOutput,
) -> Result<Outcome> {
    Generator::new(&target.class, reflector)
        .with_options(options)
        .with_handler(TargetHandler { target })
        .with_output(output)
        .generate()
}

/// Group targets by resolved document path, keeping the configured order
/// within and across groups.
fn group_by_file<'t>(
    targets: &'t [ClassTarget],
    reflector: &SourceReflector,
) -> Vec<Vec<&'t ClassTarget>> {
    let mut index: HashMap<PathBuf, usize> = HashMap::new();
    let mut groups: Vec<Vec<&ClassTarget>> = Vec::new();

    for target in targets {
        let key = reflector
            .path_of(&target.class)
            .map_or_else(|| PathBuf::from(target.file.trim()), Path::to_path_buf);
        match index.get(&key) {
            Some(&idx) => groups[idx].push(target),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![target]);
            }
        }
    }

    groups
}
