//! Excludes `.c` files with an unguarded top-level `main` definition.
use std::{fs, path::Path};

use anyhow::{Context, Result};

/// Computes, for every byte offset, whether a `#if`/`#ifdef`/`#ifndef`
/// block is open at that point by walking line by line and tracking a
/// running nesting depth.
fn nesting_depth_at(content: &str, offset: usize) -> i32 {
    let mut depth = 0;
    for line in content[..offset].lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("#if") {
            // Matches #if, #ifdef, #ifndef alike.
            depth += 1;
        } else if trimmed.starts_with("#endif") {
            depth -= 1;
        }
    }
    depth
}

fn is_boundary_before(content: &[u8], idx: usize) -> bool {
    idx == 0 || matches!(content[idx - 1], b' ' | b'\t' | b'\n' | b'\r' | b'*')
}

fn is_call_after(content: &[u8], mut idx: usize) -> bool {
    while idx < content.len() && matches!(content[idx], b' ' | b'\t') {
        idx += 1;
    }
    content.get(idx) == Some(&b'(')
}

/// True if `content` contains an unguarded top-level `main(` definition:
/// a `main` token at a plausible boundary, immediately (modulo
/// whitespace) followed by `(`, at a point where the preprocessor
/// nesting depth is zero.
fn has_unguarded_main(content: &str) -> bool {
    let bytes = content.as_bytes();
    let mut search_from = 0;
    while let Some(rel_idx) = content[search_from..].find("main") {
        let idx = search_from + rel_idx;
        let after = idx + "main".len();

        if is_boundary_before(bytes, idx) && is_call_after(bytes, after) && nesting_depth_at(content, idx) == 0 {
            return true;
        }
        search_from = idx + 1;
    }
    false
}

/// Filters `.c` candidates down to those without an unguarded top-level
/// `main`. Files that fail to read are passed through with a warning
/// logged, rather than excluded, since an unreadable file cannot be
/// proven to be an entry point.
pub fn filter_entry_points(candidates: Vec<std::path::PathBuf>) -> Result<Vec<std::path::PathBuf>> {
    let mut retained = Vec::with_capacity(candidates.len());
    for path in candidates {
        match read_content(&path) {
            Ok(content) => {
                if has_unguarded_main(&content) {
                    log::debug!("Excluding {:?}: unguarded top-level main", path);
                } else {
                    retained.push(path);
                }
            }
            Err(err) => {
                log::warn!("Failed to read {:?} during main-detection: {:#}", path, err);
                retained.push(path);
            }
        }
    }
    Ok(retained)
}

fn read_content(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read \"{}\"", path.display()))
}
