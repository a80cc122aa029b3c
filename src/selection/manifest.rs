//! Strategy A: candidate `.c` files named in a build manifest.
use std::{collections::HashMap, fs, path::Path, path::PathBuf};

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::collector::CollectedFiles;

#[cfg(test)]
use indoc::indoc;

static CMAKE_ADD_LIBRARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)add_library\s*\(([^)]*)\)").unwrap());
static MAKE_ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(?:SRCS|SOURCES|SRC|OBJS)\s*[:+]?=\s*(.*)$").unwrap());
static MESON_LIBRARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\b(?:static_library|shared_library|library)\s*\(([^)]*)\)").unwrap());
static CMAKE_KEYWORDS: [&str; 4] = ["STATIC", "SHARED", "MODULE", "OBJECT"];

/// Groups collected `.c` files by basename so a manifest token (which only
/// names a filename, never a path) can be matched against every
/// repository file that shares it.
fn index_by_basename(collected: &CollectedFiles) -> HashMap<String, Vec<PathBuf>> {
    let mut index: HashMap<String, Vec<PathBuf>> = HashMap::new();
    for path in &collected.c_files {
        if let Some(name) = path.file_name() {
            index
                .entry(name.to_string_lossy().into_owned())
                .or_default()
                .push(path.clone());
        }
    }
    index
}

fn extract_cmake(content: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for captures in CMAKE_ADD_LIBRARY.captures_iter(content) {
        let args: Vec<&str> = captures[1].split_whitespace().collect();
        for token in args.iter().skip(1) {
            if CMAKE_KEYWORDS.contains(token) {
                continue;
            }
            if token.ends_with(".c") {
                tokens.push(token.trim_matches('"').to_string());
            }
        }
    }
    tokens
}

/// Joins backslash line-continuations into a single logical line before
/// tokenizing, mirroring how make itself treats them.
fn join_continuations(text: &str) -> String {
    let mut joined = String::new();
    for line in text.lines() {
        if let Some(stripped) = line.strip_suffix('\\') {
            joined.push_str(stripped);
            joined.push(' ');
        } else {
            joined.push_str(line);
            joined.push('\n');
        }
    }
    joined
}

fn extract_make(content: &str) -> Vec<String> {
    let joined = join_continuations(content);
    let mut tokens = Vec::new();
    for captures in MAKE_ASSIGNMENT.captures_iter(&joined) {
        for token in captures[1].split_whitespace() {
            if let Some(stem) = token.strip_suffix(".o") {
                tokens.push(format!("{stem}.c"));
            } else if token.ends_with(".c") {
                tokens.push(token.to_string());
            }
        }
    }
    tokens
}

fn extract_meson(content: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for captures in MESON_LIBRARY.captures_iter(content) {
        let args = &captures[1];
        let mut chars = args.char_indices().peekable();
        while let Some((start, ch)) = chars.next() {
            if ch != '\'' {
                continue;
            }
            let rest = &args[start + 1..];
            if let Some(end) = rest.find('\'') {
                let literal = &rest[..end];
                if literal.ends_with(".c") {
                    tokens.push(literal.to_string());
                }
            }
        }
    }
    tokens
}

fn resolve_tokens(tokens: Vec<String>, index: &HashMap<String, Vec<PathBuf>>) -> Vec<PathBuf> {
    let mut selection = Vec::new();
    for token in tokens {
        let basename = Path::new(&token)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(token);
        if let Some(matches) = index.get(&basename) {
            for candidate in matches {
                if !selection.contains(candidate) {
                    selection.push(candidate.clone());
                }
            }
        }
    }
    selection
}

/// Tries `CMakeLists.txt`, then `Makefile`/`makefile`, then
/// `meson.build`, in that order, returning the first manifest's
/// resolved selection, or an empty vector if none is present or none of
/// its tokens matched a collected file.
pub fn extract(repo_root: &Path, collected: &CollectedFiles) -> Result<Vec<PathBuf>> {
    let index = index_by_basename(collected);

    let manifests: [(&str, fn(&str) -> Vec<String>); 4] = [
        ("CMakeLists.txt", extract_cmake),
        ("Makefile", extract_make),
        ("makefile", extract_make),
        ("meson.build", extract_meson),
    ];

    for (name, extractor) in manifests {
        let path = repo_root.join(name);
        if !path.is_file() {
            continue;
        }
        let content = fs::read_to_string(&path)?;
        let tokens = extractor(&content);
        let selection = resolve_tokens(tokens, &index);
        if !selection.is_empty() {
            log::debug!("Strategy A matched {} file(s) via {}", selection.len(), name);
            return Ok(selection);
        }
    }

    Ok(Vec::new())
}
