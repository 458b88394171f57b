//! BM25 scoring.
//!
//! Pure function from per-term frequency, document frequency, document
//! length, and collection averages to a score contribution. No I/O, no
//! state — the DAAT engine sums this across matched terms per document.
//!
//! ```text
//! IDF(t)  = ln( (N - f_t + 0.5) / (f_t + 0.5) )
//! TF(t,d) = (k1 + 1) * tf(t,d) / ( K + tf(t,d) )
//! K       = k1 * ( (1 - b) + b * docLen(d) / D_AVG )
//! ```
//!
//! `IDF` may go negative when `f_t` exceeds `N / 2`; this is permitted —
//! downstream ordering only requires monotonicity in `tf`, not non-negative
//! scores.

use crate::config::Bm25Params;

/// Scores a single term's contribution to a document's BM25 total.
///
/// `tf` is the term frequency in the document, `f_t` the term's document
/// frequency (approximated by chunk count upstream, see [`crate::cursor`]),
/// `n` the collection size, `doc_len`/`avg_doc_len` the document's length
/// and the collection average.
#[inline]
pub fn score_term(
    tf: f32,
    f_t: f32,
    n: f32,
    doc_len: f32,
    avg_doc_len: f32,
    params: Bm25Params,
) -> f32 {
    let idf = ((n - f_t + 0.5) / (f_t + 0.5)).ln();
    let k = params.k1 * ((1.0 - params.b) + params.b * doc_len / avg_doc_len);
    let tf_component = (params.k1 + 1.0) * tf / (k + tf);
    idf * tf_component
}
