//! Definition and parsing of cli arguments
use std::path::PathBuf;

use clap::{AppSettings, Parser};
use giga_header::selection::Strategy;
use log::LevelFilter;

/// giga-header discovers the library portion of a C source repository and amalgamates it into a
/// single self-contained header. Local includes are inlined depth-first and visit-once; standard
/// and external includes are partitioned into a classified preamble at the top of the file.
///
/// Use -h for short descriptions of the available options or --help for more details.
#[derive(Debug, Parser)]
#[clap(
    author,
    version,
    setting = AppSettings::HidePossibleValuesInHelp | AppSettings::ArgRequiredElseHelp
)]
pub struct Opts {
    /// Local directory of the repository to amalgamate.
    ///
    /// Acquisition/cloning is out of scope: the repository must already be checked out on disk.
    #[clap(parse(from_os_str))]
    pub repo_dir: PathBuf,

    /// Write the amalgamated header to this path instead of "<name>_combined.h".
    #[clap(short, long, parse(from_os_str), value_name = "path")]
    pub output: Option<PathBuf>,

    /// Repository name used for the include guard and default output filename.
    ///
    /// Defaults to the basename of the repository directory.
    #[clap(long, value_name = "name")]
    pub name: Option<String>,

    /// Force a specific selection strategy instead of the default fixed-preference search.
    #[clap(
        long,
        value_name = "strategy",
        possible_values = &Strategy::NAMES,
        default_value = "auto"
    )]
    pub strategy: Strategy,

    /// Override the compile-feedback loop's iteration cap.
    #[clap(long, value_name = "n", default_value = "10")]
    pub max_iterations: usize,

    /// Override host compiler discovery (otherwise "cc", "gcc", "clang" are tried in order).
    #[clap(long, parse(from_os_str), value_name = "path")]
    pub compiler: Option<PathBuf>,

    /// Increase the verbosity of the output (can be passed multiple times).
    ///
    /// By default, only warnings and errors are reported. Passing '-v' includes info, '-vv' debug,
    /// and '-vvv` trace log messages.
    #[clap(short, long, parse(from_occurrences))]
    verbose: i8,

    /// Report only errors (-q) or nothing (-qq)
    #[clap(short, long, parse(from_occurrences), conflicts_with = "verbose")]
    quiet: i8,
}

impl Opts {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose - self.quiet {
            i8::MIN..=-2 => LevelFilter::Off,
            -1 => LevelFilter::Error,
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            3..=i8::MAX => LevelFilter::Trace,
        }
    }
}
