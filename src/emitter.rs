//! Composes the final amalgamated artifact and its line map.
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::inliner::Inliner;

/// One entry of the line map: an inclusive, 1-based line range in the
/// final artifact that was contributed by inlining `source_path` as a
/// top-level `.c` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMapEntry {
    pub source_path: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
}

/// The composed artifact together with the line map needed by the
/// Compile Loop to attribute a diagnostic back to a source file.
#[derive(Debug)]
pub struct Emission {
    pub artifact: String,
    pub line_map: Vec<LineMapEntry>,
}

/// Transforms a repository name into an include guard: lowercase letters
/// are uppercased, digits pass through unchanged, and every other
/// character — including characters that were already uppercase —
/// becomes an underscore. This matches the reference conversion exactly;
/// it is not "fixed" to treat uppercase letters specially.
pub fn guard_name(repo_name: &str) -> String {
    repo_name
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() {
                c.to_ascii_uppercase()
            } else if c.is_ascii_digit() {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn count_lines(text: &str) -> usize {
    text.matches('\n').count()
}

fn relative_display(repo_root: &Path, path: &Path) -> String {
    path.strip_prefix(repo_root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Composes the body (one entry per selected `.c` file, plus an optional
/// header sweep) and records the line map relative to the body buffer.
/// The caller shifts the map by the preamble's line count once the
/// preamble is known.
fn compose_body(
    repo_root: &Path,
    selection: &[PathBuf],
    inliner: &mut Inliner<'_>,
    header_sweep: Option<&[PathBuf]>,
) -> Result<(String, Vec<LineMapEntry>)> {
    let mut body = String::new();
    let mut line_map = Vec::with_capacity(selection.len());

    for path in selection {
        let start_line = count_lines(&body) + 1;
        body.push('\n');
        body.push_str(&format!("/* {} */\n", relative_display(repo_root, path)));
        inliner.inline_top_level(path, &mut body)?;
        let end_line = count_lines(&body);
        line_map.push(LineMapEntry {
            source_path: path.clone(),
            start_line,
            end_line,
        });
    }

    if let Some(headers) = header_sweep {
        inliner.sweep_remaining_headers(repo_root, headers, &mut body)?;
    }

    Ok((body, line_map))
}

fn compose_preamble(guard: &str, repo_name: &str, inliner: &Inliner<'_>) -> String {
    let mut preamble = format!(
        "#ifndef {guard}_COMBINED_H\n#define {guard}_COMBINED_H\n\n\
         /*\n * Auto-generated header-only file\n * Repository: {repo_name}\n */\n\n"
    );

    let buckets = inliner.buckets();
    if !buckets.standard().is_empty() {
        for token in buckets.standard() {
            preamble.push_str(&format!("#include <{token}>\n"));
        }
        preamble.push('\n');
    }
    if !buckets.external().is_empty() {
        for token in buckets.external() {
            preamble.push_str(&format!("#include <{token}>\n"));
        }
        preamble.push('\n');
    }
    preamble
}

/// Builds the complete artifact for `selection`, streaming through
/// `inliner`, and returns it together with a line map indexing into the
/// final (preamble-shifted) artifact.
pub fn emit(
    repo_name: &str,
    repo_root: &Path,
    selection: &[PathBuf],
    inliner: &mut Inliner<'_>,
    header_sweep: Option<&[PathBuf]>,
) -> Result<Emission> {
    let (body, mut line_map) = compose_body(repo_root, selection, inliner, header_sweep)?;
    let guard = guard_name(repo_name);
    let preamble = compose_preamble(&guard, repo_name, inliner);
    let preamble_lines = count_lines(&preamble);

    for entry in &mut line_map {
        entry.start_line += preamble_lines;
        entry.end_line += preamble_lines;
    }

    let mut artifact = preamble;
    artifact.push_str(&body);
    artifact.push('\n');
    artifact.push_str(&format!("#endif /* {guard}_COMBINED_H */\n"));

    Ok(Emission { artifact, line_map })
}
