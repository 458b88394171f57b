//! Collaborator adapters (C6): read-only views over the URL table, lexicon,
//! index file, document store, and snippet extractor. The core (VByte
//! codec, cursor, BM25 scorer, DAAT engine) depends only on these trait
//! boundaries, never on a concrete backend.

pub mod document_store;
pub mod index_file;
pub mod lexicon;
pub mod snippet;
pub mod url_table;

pub use document_store::{DocumentStore, InMemoryDocumentStore, SqliteDocumentStore};
pub use index_file::{IndexFile, RandomAccessSource};
pub use lexicon::{Lexicon, LexiconEntry};
pub use url_table::{UrlEntry, UrlTable};
