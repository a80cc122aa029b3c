//! Resolves include tokens to files, either inside the repository or on
//! the host toolchain's system search paths.
use std::{
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Result};

/// System include directories, discovered once per process and shared
/// read-only across conversions.
#[derive(Debug, Clone)]
pub struct SystemIncludePaths {
    dirs: Vec<PathBuf>,
}

impl SystemIncludePaths {
    /// Builds the fixed list of system include directories: `/usr/include`,
    /// `/usr/local/include`, and the compiler's reported builtin include
    /// directory. Entries that don't exist or aren't directories are
    /// silently dropped.
    pub fn discover(compiler: &Path) -> Self {
        let mut candidates = vec![
            PathBuf::from("/usr/include"),
            PathBuf::from("/usr/local/include"),
        ];
        if let Some(builtin) = builtin_include_dir(compiler) {
            candidates.push(builtin);
        }

        let dirs: Vec<_> = candidates.into_iter().filter(|dir| dir.is_dir()).collect();
        log::debug!("System include paths: {:?}", dirs);
        Self { dirs }
    }

    /// For tests and callers that already know their search path.
    pub fn from_dirs(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs: dirs.into_iter().filter(|dir| dir.is_dir()).collect(),
        }
    }

    /// Whether `token` resolves against any system include directory.
    pub fn contains(&self, token: &str) -> bool {
        self.dirs.iter().any(|dir| dir.join(token).is_file())
    }
}

fn builtin_include_dir(compiler: &Path) -> Option<PathBuf> {
    let output = Command::new(compiler)
        .arg("-print-file-name=include")
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let reported = String::from_utf8_lossy(&output.stdout);
    let trimmed = reported.trim();
    if trimmed.is_empty() || trimmed == "include" {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

/// Resolves quoted includes against the repository and angled/unresolved
/// quoted includes against the host system paths.
#[derive(Debug)]
pub struct HeaderResolver<'a> {
    repo_root: PathBuf,
    system_paths: &'a SystemIncludePaths,
}

impl<'a> HeaderResolver<'a> {
    pub fn new(repo_root: impl Into<PathBuf>, system_paths: &'a SystemIncludePaths) -> Self {
        Self {
            repo_root: repo_root.into(),
            system_paths,
        }
    }

    /// Attempts to resolve a quoted include to a file inside the
    /// repository, trying `current_dir`, the repo root, and then
    /// `include/`, `src/`, `lib/` under the repo root, in that order.
    pub fn resolve_in_repo(&self, token: &str, current_dir: &Path) -> Result<Option<PathBuf>> {
        let candidates = [
            current_dir.join(token),
            self.repo_root.join(token),
            self.repo_root.join("include").join(token),
            self.repo_root.join("src").join(token),
            self.repo_root.join("lib").join(token),
        ];

        for candidate in candidates {
            log::trace!("Trying to resolve \"{}\" to {:?}", token, candidate);
            if candidate.is_file() {
                let canonical = candidate.canonicalize().with_context(|| {
                    format!("failed to canonicalize \"{}\"", candidate.display())
                })?;
                log::debug!("Resolved \"{}\" in-repo to {:?}", token, canonical);
                return Ok(Some(canonical));
            }
        }
        log::debug!("Failed to resolve \"{}\" in-repo", token);
        Ok(None)
    }

    /// Whether `token` is available on the host toolchain's system search
    /// paths. Used to decide between the `standard` and `external`
    /// include buckets.
    pub fn is_system_available(&self, token: &str) -> bool {
        self.system_paths.contains(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path.canonicalize().unwrap()
    }

    #[test]
    fn prefers_current_dir_over_repo_root() {
        let repo = TempDir::new().unwrap();
        let nested = repo.path().join("nested");
        fs::create_dir(&nested).unwrap();
        write(repo.path(), "a.h", "// repo root\n");
        let local = write(&nested, "a.h", "// nested\n");

        let system = SystemIncludePaths::from_dirs(vec![]);
        let resolver = HeaderResolver::new(repo.path(), &system);
        let found = resolver.resolve_in_repo("a.h", &nested).unwrap().unwrap();
        assert_eq!(found, local);
    }

    #[test]
    fn falls_back_through_include_src_lib() {
        let repo = TempDir::new().unwrap();
        let expected = write(repo.path(), "src/a.h", "// src\n");

        let system = SystemIncludePaths::from_dirs(vec![]);
        let resolver = HeaderResolver::new(repo.path(), &system);
        let found = resolver
            .resolve_in_repo("a.h", repo.path())
            .unwrap()
            .unwrap();
        assert_eq!(found, expected);
    }

    #[test]
    fn unresolvable_in_repo_returns_none() {
        let repo = TempDir::new().unwrap();
        let system = SystemIncludePaths::from_dirs(vec![]);
        let resolver = HeaderResolver::new(repo.path(), &system);
        assert!(resolver
            .resolve_in_repo("missing.h", repo.path())
            .unwrap()
            .is_none());
    }

    #[test]
    fn system_paths_report_availability() {
        let sys_dir = TempDir::new().unwrap();
        fs::write(sys_dir.path().join("stdio.h"), "").unwrap();
        let system = SystemIncludePaths::from_dirs(vec![sys_dir.path().to_path_buf()]);
        assert!(system.contains("stdio.h"));
        assert!(!system.contains("nonexistent_external.h"));
    }
}
