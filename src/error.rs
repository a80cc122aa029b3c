//! Domain-level error kinds for the amalgamation engine.
use std::{
    error, fmt,
    path::{Path, PathBuf},
};

/// Errors surfaced across the conversion's public boundary.
///
/// Internal-only failure modes (an unparseable compiler diagnostic, a
/// missing compiler) are not represented here: they are logged and
/// absorbed by the component that encounters them, per the engine's
/// recovery policy.
#[derive(Debug)]
pub enum EngineError {
    /// `repo_name` could not be derived from the given path.
    InvalidRepoIdentifier { path: PathBuf },
    /// The pre-conversion scan found no `.c` files anywhere in the tree.
    EmptyRepo { repo_dir: PathBuf },
    /// Writing the final artifact failed.
    EmitFailure { reason: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRepoIdentifier { path } => {
                write!(
                    f,
                    "could not derive a repository name from \"{}\"",
                    path.display()
                )
            }
            Self::EmptyRepo { repo_dir } => {
                write!(f, "no C files found in repository \"{}\"", repo_dir.display())
            }
            Self::EmitFailure { reason } => {
                write!(f, "failed to create header-only file: {reason}")
            }
        }
    }
}

impl error::Error for EngineError {}

pub fn invalid_repo_identifier(path: &Path) -> EngineError {
    EngineError::InvalidRepoIdentifier {
        path: path.to_path_buf(),
    }
}
