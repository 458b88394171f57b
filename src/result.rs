//! Output types for a completed search: one ranked hit per surviving
//! document, carrying everything the CLI needs to print a result line.

/// One ranked hit: URL, BM25 score, and a snippet when the document body
/// could be retrieved and a window around the query terms could be built.
#[derive(Debug, Clone)]
pub struct RankedHit {
    pub did: u64,
    pub url: String,
    pub score: f32,
    pub snippet: Option<String>,
}
