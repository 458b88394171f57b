//! Disk-backed inverted-index query processor.
//!
//! Reads a lexicon, URL table, and VByte-compressed inverted index built by
//! an external offline builder, and answers boolean keyword queries
//! ("cat and dog", "cat or dog") ranked by BM25.

pub mod bm25;
pub mod collaborators;
pub mod config;
pub mod cursor;
pub mod daat;
pub mod dispatcher;
pub mod error;
pub mod result;
pub mod vbyte;

pub use config::{Bm25Params, EngineConfig};
pub use dispatcher::{Connective, Dispatcher};
pub use result::RankedHit;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
