//! Tunable constants for BM25 scoring and posting-list chunking.
//!
//! Mirrors the teacher's `profiles::Bm25Params` / `TurboConfig` pattern:
//! fixed constants are still struct fields with a `Default` impl, not
//! scattered literals, so a caller can override them without touching the
//! core algorithms.

/// BM25 tuning parameters.
#[derive(Debug, Clone, Copy)]
pub struct Bm25Params {
    /// Term-frequency saturation parameter.
    pub k1: f32,
    /// Document-length normalization parameter.
    pub b: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

/// Engine-wide configuration: scoring parameters, result bound, and the
/// posting-list chunk size the on-disk format was built with.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub bm25: Bm25Params,
    /// Number of top-scoring results kept per query.
    pub top_k: usize,
    /// Maximum postings per chunk in the on-disk inverted-list format.
    pub chunk_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bm25: Bm25Params::default(),
            top_k: 10,
            chunk_size: 128,
        }
    }
}
