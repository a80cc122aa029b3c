//! Depth-first, visit-once inlining of local includes.
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::{
    buckets::IncludeBuckets,
    include_parser::{parse_include, IncludeKind},
    resolve::HeaderResolver,
};

/// Streams source files, substituting resolved local includes with their
/// inlined contents and routing everything else into the classification
/// buckets. One instance is shared across every top-level `.c` file in a
/// conversion so that the visit-once set and the buckets accumulate
/// correctly.
pub struct Inliner<'a> {
    resolver: HeaderResolver<'a>,
    buckets: IncludeBuckets,
    inlined: HashSet<PathBuf>,
}

impl<'a> Inliner<'a> {
    pub fn new(resolver: HeaderResolver<'a>) -> Self {
        Self {
            resolver,
            buckets: IncludeBuckets::new(),
            inlined: HashSet::new(),
        }
    }

    pub fn buckets(&self) -> &IncludeBuckets {
        &self.buckets
    }

    pub fn is_inlined(&self, path: &Path) -> bool {
        self.inlined.contains(path)
    }

    /// Streams a top-level `.c` file's content into `out`. Unlike a
    /// header reached through an include, a top-level entry is always
    /// streamed (it is never itself subject to the visit-once check).
    pub fn inline_top_level(&mut self, path: &Path, out: &mut String) -> Result<()> {
        log::info!("Processing source file {:?}", debug_name(path));
        self.stream_lines(path, out)
    }

    /// Inlines every collected header not yet visited, for the
    /// compile-feedback strategy's header sweep. Headers whose
    /// repository-relative path touches a test/example/benchmark
    /// directory are skipped.
    pub fn sweep_remaining_headers(
        &mut self,
        repo_root: &Path,
        headers: &[PathBuf],
        out: &mut String,
    ) -> Result<()> {
        for header in headers {
            if self.inlined.contains(header) {
                continue;
            }
            if is_excluded_from_sweep(repo_root, header) {
                log::debug!("Skipping {:?} from header sweep", header);
                continue;
            }
            let token = header
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| header.display().to_string());
            self.inline_resolved(header, &token, out)?;
        }
        Ok(())
    }

    fn stream_lines(&mut self, path: &Path, out: &mut String) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read \"{}\"", path.display()))?;
        let current_dir = path
            .parent()
            .context("processed file has no parent directory")?
            .to_path_buf();

        for line in content.split_inclusive('\n') {
            self.process_line(line, &current_dir, out)?;
        }
        Ok(())
    }

    fn process_line(&mut self, line: &str, current_dir: &Path, out: &mut String) -> Result<()> {
        let Some(parsed) = parse_include(line) else {
            out.push_str(line);
            if !line.ends_with('\n') {
                out.push('\n');
            }
            return Ok(());
        };

        match parsed.kind {
            IncludeKind::Quoted => {
                let token = parsed.token.to_string();
                match self.resolver.resolve_in_repo(&token, current_dir)? {
                    Some(resolved) => {
                        if !self.inlined.contains(&resolved) {
                            self.inline_resolved(&resolved, &token, out)?;
                        } else {
                            log::debug!("Skipping \"{}\", already inlined", token);
                        }
                    }
                    None => {
                        let is_standard = self.resolver.is_system_available(&token);
                        self.buckets.classify(&token, is_standard);
                    }
                }
            }
            IncludeKind::Angled => {
                let token = parsed.token.to_string();
                let is_standard = self.resolver.is_system_available(&token);
                self.buckets.classify(&token, is_standard);
            }
        }
        Ok(())
    }

    fn inline_resolved(&mut self, resolved: &Path, token: &str, out: &mut String) -> Result<()> {
        self.inlined.insert(resolved.to_path_buf());
        out.push_str(&format!("/* --- Inlined: {token} --- */\n"));
        self.stream_lines(resolved, out)?;
        out.push_str(&format!("/* --- End: {token} --- */\n"));
        Ok(())
    }
}

fn is_excluded_from_sweep(repo_root: &Path, header: &Path) -> bool {
    const EXCLUDED: [&str; 6] = ["test", "tests", "example", "examples", "bench", "benchmark"];
    let relative = header.strip_prefix(repo_root).unwrap_or(header);
    relative
        .components()
        .any(|component| EXCLUDED.contains(&component.as_os_str().to_string_lossy().as_ref()))
}

fn debug_name(path: &Path) -> std::ffi::OsString {
    path.file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_else(|| "<no file name?>".into())
}
