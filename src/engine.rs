//! Top-level orchestration: wires the File Collector, Main-Detector,
//! Selection Strategies, and Emitter into one conversion.
use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;

use crate::{
    collector::{self, CollectedFiles},
    compile_loop::HostCompiler,
    emitter::{self, Emission},
    error::{self, EngineError},
    inliner::Inliner,
    main_detector,
    resolve::{HeaderResolver, SystemIncludePaths},
    selection::{self, Selected, Strategy},
};

/// Everything a conversion needs from the CLI (or any other caller).
pub struct ConversionOptions {
    pub repo_dir: PathBuf,
    pub output_path: PathBuf,
    pub repo_name: Option<String>,
    pub compiler_path: Option<PathBuf>,
    pub max_iterations: usize,
    pub strategy: Strategy,
}

/// Reported back to the caller once the artifact has been written.
#[derive(Debug)]
pub struct ConversionSummary {
    pub repo_name: String,
    pub strategy: &'static str,
    pub total_c_files: usize,
    pub total_h_files: usize,
    pub selected_files: usize,
    pub compile_loop_iterations: usize,
}

fn derive_repo_name(repo_dir: &Path) -> Result<String> {
    repo_dir
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| error::invalid_repo_identifier(repo_dir).into())
}

fn locate_compiler(preferred: Option<&Path>) -> PathBuf {
    if let Some(path) = preferred {
        return path.to_path_buf();
    }
    for candidate in ["cc", "gcc", "clang"] {
        if let Ok(found) = which::which(candidate) {
            return found;
        }
    }
    log::warn!("No host C compiler found on PATH; compile-feedback will be unavailable");
    PathBuf::from("cc")
}

fn emit_without_feedback(
    repo_name: &str,
    repo_dir: &Path,
    files: &[PathBuf],
    system_paths: &SystemIncludePaths,
) -> Result<Emission> {
    let resolver = HeaderResolver::new(repo_dir, system_paths);
    let mut inliner = Inliner::new(resolver);
    emitter::emit(repo_name, repo_dir, files, &mut inliner, None)
}

/// Runs a complete conversion: collect, filter entry points, select the
/// library file set, amalgamate it, and write the result to
/// `options.output_path`.
pub fn convert(options: &ConversionOptions) -> Result<ConversionSummary> {
    let repo_name = match &options.repo_name {
        Some(name) => name.clone(),
        None => derive_repo_name(&options.repo_dir)?,
    };

    let collected = collector::collect(&options.repo_dir)?;
    if collected.c_files.is_empty() {
        return Err(EngineError::EmptyRepo {
            repo_dir: options.repo_dir.clone(),
        }
        .into());
    }

    let candidates = main_detector::filter_entry_points(collected.c_files.clone())?;
    let filtered = CollectedFiles {
        c_files: candidates,
        h_files: collected.h_files.clone(),
    };

    let compiler_path = locate_compiler(options.compiler_path.as_deref());
    let system_paths = SystemIncludePaths::discover(&compiler_path);
    let checker = HostCompiler { compiler_path };

    let selected = selection::select(
        &repo_name,
        &options.repo_dir,
        &filtered,
        &system_paths,
        &checker,
        options.max_iterations,
        options.strategy,
    )?;

    let strategy = selected.strategy_name();
    let (emission, selected_files, compile_loop_iterations) = match selected {
        Selected::Manifest(files) | Selected::Headers(files) => {
            let emission = emit_without_feedback(&repo_name, &options.repo_dir, &files, &system_paths)?;
            let count = files.len();
            (emission, count, 0)
        }
        Selected::Feedback(outcome) => {
            let count = outcome.selection.len();
            (outcome.emission, count, outcome.iterations)
        }
    };

    if selected_files == 0 {
        log::warn!("No strategy selected any files; emitting an empty-body header");
    }

    fs::write(&options.output_path, &emission.artifact).map_err(|err| {
        EngineError::EmitFailure {
            reason: err.to_string(),
        }
    })?;
    log::info!(
        "Wrote {} to \"{}\" via {} strategy",
        repo_name,
        options.output_path.display(),
        strategy
    );

    Ok(ConversionSummary {
        repo_name,
        strategy,
        total_c_files: collected.c_files.len(),
        total_h_files: collected.h_files.len(),
        selected_files,
        compile_loop_iterations,
    })
}
