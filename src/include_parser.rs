//! Recognizes `#include` directives on a single line.

/// The delimiter kind of an `#include` directive, or `None` if the line
/// is not a (directly-written, non-macro) include directive at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeKind {
    Quoted,
    Angled,
}

/// A parsed `#include` directive: its delimiter kind and the token found
/// between the delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInclude<'a> {
    pub kind: IncludeKind,
    pub token: &'a str,
}

fn skip_ws(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() && (bytes[idx] == b' ' || bytes[idx] == b'\t') {
        idx += 1;
    }
    idx
}

fn skip_literal<'a>(bytes: &'a [u8], idx: usize, literal: &str) -> Option<usize> {
    let end = idx + literal.len();
    if bytes.get(idx..end) == Some(literal.as_bytes()) {
        Some(end)
    } else {
        None
    }
}

/// Parses a single line for a quoted or angle-bracketed `#include`.
///
/// Returns `None` for lines that are not include directives, lines using
/// a macro-indirect form (`#include SOMETHING`), and lines whose opening
/// delimiter is never closed.
pub fn parse_include(line: &str) -> Option<ParsedInclude<'_>> {
    let bytes = line.as_bytes();
    let mut idx = skip_ws(bytes, 0);

    idx = if *bytes.get(idx)? == b'#' { idx + 1 } else { return None };
    idx = skip_ws(bytes, idx);
    idx = skip_literal(bytes, idx, "include")?;
    idx = skip_ws(bytes, idx);

    let (kind, closing) = match *bytes.get(idx)? {
        b'"' => (IncludeKind::Quoted, b'"'),
        b'<' => (IncludeKind::Angled, b'>'),
        _ => return None,
    };
    let token_start = idx + 1;
    let token_end = bytes[token_start..]
        .iter()
        .position(|&b| b == closing)
        .map(|offset| token_start + offset)?;

    Some(ParsedInclude {
        kind,
        token: &line[token_start..token_end],
    })
}
