#![warn(
    // Lint groups
    future_incompatible,
    nonstandard_style,
    rust_2018_compatibility,
    rust_2018_idioms,
    rust_2021_compatibility,
    // Allow by default
    elided_lifetimes_in_paths,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    // Clippy
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::clone_on_ref_ptr,
    clippy::decimal_literal_representation,
    clippy::filetype_is_file,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::if_then_some_else_none,
    clippy::rc_mutex,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::shadow_unrelated,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::verbose_file_reads,
)]
#![allow(clippy::module_name_repetitions, clippy::non_ascii_literal)]

mod cli;

use std::env;

use anyhow::Result;
use giga_header::engine::{ConversionOptions, ConversionSummary};
use log::{error, info};

use crate::cli::Opts;

fn default_output_path(opts: &Opts, repo_name: &str) -> std::path::PathBuf {
    opts.output
        .clone()
        .unwrap_or_else(|| std::path::PathBuf::from(format!("{repo_name}_combined.h")))
}

fn try_main() -> Result<ConversionSummary> {
    let opts = Opts::parse();

    let mut builder = env_logger::builder();
    if env::var_os("RUST_LOG_VERBOSE").is_some() {
        builder.format_timestamp_millis();
    } else {
        builder
            .format_level(true)
            .format_module_path(false)
            .format_target(false)
            .format_timestamp(None);
    }
    builder.filter_level(opts.log_level()).init();

    let repo_name = opts
        .name
        .clone()
        .or_else(|| opts.repo_dir.file_name().map(|name| name.to_string_lossy().into_owned()));
    let output_path = default_output_path(&opts, repo_name.as_deref().unwrap_or("combined"));

    info!("Converting repository at {:?}", opts.repo_dir);
    let options = ConversionOptions {
        repo_dir: opts.repo_dir,
        output_path,
        repo_name,
        compiler_path: opts.compiler,
        max_iterations: opts.max_iterations,
        strategy: opts.strategy,
    };

    giga_header::engine::convert(&options)
}

fn main() {
    match try_main() {
        Ok(summary) => {
            info!(
                "{}: {} of {} .c file(s) selected via {} strategy ({} compile-loop iteration(s))",
                summary.repo_name,
                summary.selected_files,
                summary.total_c_files,
                summary.strategy,
                summary.compile_loop_iterations,
            );
        }
        Err(error) => {
            error!("{:#}", error);
            std::process::exit(1);
        }
    }
}
