//! Runs the selection strategies in fixed preference order, keeping
//! the first one that nominates a non-empty set of library files.
mod headers;
mod manifest;

use std::{path::{Path, PathBuf}, str::FromStr};

use anyhow::{Error, Result};

use crate::{
    collector::CollectedFiles,
    compile_loop::{self, CompileLoopOutcome, SyntaxChecker},
    resolve::SystemIncludePaths,
};

/// Which strategy the caller wants to run: `Auto` walks the fixed
/// preference order and keeps the first non-empty result, the others
/// force a single named strategy regardless of what it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Auto,
    Manifest,
    Headers,
    Feedback,
}

impl Strategy {
    pub const NAMES: [&'static str; 4] = ["auto", "manifest", "headers", "feedback"];
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "auto" => Self::Auto,
            "manifest" => Self::Manifest,
            "headers" => Self::Headers,
            "feedback" => Self::Feedback,
            _ => anyhow::bail!("Invalid strategy: \"{}\"", s),
        })
    }
}

/// Which strategy produced the selection, and its result. Strategy C
/// already carries a finished compile-loop outcome (selection plus
/// emitted artifact) since running it *is* how it decides membership;
/// strategies A and B only nominate a file list for the caller to emit.
pub enum Selected {
    Manifest(Vec<PathBuf>),
    Headers(Vec<PathBuf>),
    Feedback(CompileLoopOutcome),
}

impl Selected {
    pub fn strategy_name(&self) -> &'static str {
        match self {
            Selected::Manifest(_) => "manifest",
            Selected::Headers(_) => "headers",
            Selected::Feedback(_) => "feedback",
        }
    }
}

fn run_feedback(
    repo_name: &str,
    repo_root: &Path,
    collected: &CollectedFiles,
    system_paths: &SystemIncludePaths,
    checker: &dyn SyntaxChecker,
    max_iterations: usize,
) -> Result<Selected> {
    log::info!(
        "Running Strategy C (compile feedback) over {} file(s)",
        collected.c_files.len()
    );
    let outcome = compile_loop::run(
        repo_name,
        repo_root,
        collected.c_files.clone(),
        Some(&collected.h_files),
        system_paths,
        checker,
        max_iterations,
    )?;
    Ok(Selected::Feedback(outcome))
}

#[allow(clippy::too_many_arguments)]
pub fn select(
    repo_name: &str,
    repo_root: &Path,
    collected: &CollectedFiles,
    system_paths: &SystemIncludePaths,
    checker: &dyn SyntaxChecker,
    max_iterations: usize,
    forced: Strategy,
) -> Result<Selected> {
    match forced {
        Strategy::Manifest => return Ok(Selected::Manifest(manifest::extract(repo_root, collected)?)),
        Strategy::Headers => return Ok(Selected::Headers(headers::pair(collected))),
        Strategy::Feedback => {
            return run_feedback(repo_name, repo_root, collected, system_paths, checker, max_iterations)
        }
        Strategy::Auto => {}
    }

    let manifest_selection = manifest::extract(repo_root, collected)?;
    if !manifest_selection.is_empty() {
        log::info!("Strategy A (build manifest) selected {} file(s)", manifest_selection.len());
        return Ok(Selected::Manifest(manifest_selection));
    }

    let header_selection = headers::pair(collected);
    if !header_selection.is_empty() {
        log::info!("Strategy B (header pairing) selected {} file(s)", header_selection.len());
        return Ok(Selected::Headers(header_selection));
    }

    run_feedback(repo_name, repo_root, collected, system_paths, checker, max_iterations)
}
