//! Snippet extraction, reproducing the original `generateSnippet`: find
//! each query term's first byte offset in the (re-lowercased) document,
//! take a window 500 bytes before the earliest and 500 after the latest,
//! capped at 2000 bytes total, with newlines replaced by spaces.

const CONTEXT_RADIUS: usize = 500;
const MAX_SNIPPET_LEN: usize = 2000;

/// Returns `None` if any query term cannot be found in the document — the
/// original source treats this as an unreachable error condition; this
/// crate treats it as "no snippet available" rather than aborting, since a
/// single bad snippet should not take down a working ranked result.
pub fn snippet(terms: &[String], doc_text: &str) -> Option<String> {
    if terms.is_empty() {
        return None;
    }

    let lowered = doc_text.to_lowercase();

    let mut positions = Vec::with_capacity(terms.len());
    for term in terms {
        let pos = lowered.find(term.as_str())?;
        positions.push(pos);
    }

    let min_pos = *positions.iter().min().unwrap();
    let max_pos = *positions.iter().max().unwrap();

    let start = min_pos.saturating_sub(CONTEXT_RADIUS);
    let end = (max_pos + CONTEXT_RADIUS).min(lowered.len());
    let end = start + (end - start).min(MAX_SNIPPET_LEN);
    let end = end.min(lowered.len());

    // `start`/`end` are plain byte offsets from `find`/arithmetic, not
    // necessarily UTF-8 char boundaries — widen outward to the nearest one
    // before slicing so a multi-byte character at the window edge doesn't
    // panic the string index.
    let start = floor_char_boundary(&lowered, start);
    let end = ceil_char_boundary(&lowered, end);

    let mut window = lowered[start..end].replace('\n', " ");
    window = window.replace('\r', " ");
    Some(window)
}

/// Largest byte index `<= pos` that lands on a char boundary.
fn floor_char_boundary(s: &str, pos: usize) -> usize {
    let mut pos = pos.min(s.len());
    while pos > 0 && !s.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Smallest byte index `>= pos` that lands on a char boundary.
fn ceil_char_boundary(s: &str, pos: usize) -> usize {
    let mut pos = pos.min(s.len());
    while pos < s.len() && !s.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}
