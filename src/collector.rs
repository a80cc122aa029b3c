//! Walks a repository tree and enumerates `.c`/`.h` files.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// The result of a pre-conversion scan of a repository tree.
#[derive(Debug, Clone, Default)]
pub struct CollectedFiles {
    pub c_files: Vec<PathBuf>,
    pub h_files: Vec<PathBuf>,
}

impl CollectedFiles {
    pub fn is_empty(&self) -> bool {
        self.c_files.is_empty() && self.h_files.is_empty()
    }
}

fn is_hidden_git_entry(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name() == ".git"
}

/// Recursively enumerates `.c` and `.h` files under `repo_dir`,
/// canonicalizing each path. Directories named `.git` are skipped
/// entirely; `.`/`..` are never yielded by directory enumeration in the
/// first place.
pub fn collect(repo_dir: &Path) -> Result<CollectedFiles> {
    let mut collected = CollectedFiles::default();

    let walker = WalkDir::new(repo_dir)
        .into_iter()
        .filter_entry(|entry| !is_hidden_git_entry(entry));

    for entry in walker {
        let entry = entry.with_context(|| {
            format!("failed to walk repository tree at \"{}\"", repo_dir.display())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("c") => collected.c_files.push(canonicalize(path)?),
            Some("h") => collected.h_files.push(canonicalize(path)?),
            _ => {}
        }
    }

    log::info!(
        "Collected {} .c file(s) and {} .h file(s) under \"{}\"",
        collected.c_files.len(),
        collected.h_files.len(),
        repo_dir.display()
    );
    Ok(collected)
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("failed to canonicalize \"{}\"", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn collects_c_and_h_files_recursively() {
        let repo = TempDir::new().unwrap();
        touch(repo.path(), "a.c");
        touch(repo.path(), "include/a.h");
        touch(repo.path(), "src/nested/b.c");
        touch(repo.path(), "README.md");

        let collected = collect(repo.path()).unwrap();
        assert_eq!(collected.c_files.len(), 2);
        assert_eq!(collected.h_files.len(), 1);
    }

    #[test]
    fn skips_git_directory() {
        let repo = TempDir::new().unwrap();
        touch(repo.path(), "a.c");
        touch(repo.path(), ".git/objects/pack/fake.c");

        let collected = collect(repo.path()).unwrap();
        assert_eq!(collected.c_files.len(), 1);
    }

    #[test]
    fn is_case_sensitive_about_extensions() {
        let repo = TempDir::new().unwrap();
        touch(repo.path(), "a.C");
        touch(repo.path(), "a.H");

        let collected = collect(repo.path()).unwrap();
        assert!(collected.c_files.is_empty());
        assert!(collected.h_files.is_empty());
    }
}
