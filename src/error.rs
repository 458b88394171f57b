//! Error taxonomy for the query processor.
//!
//! One `thiserror` enum per failure domain, mirroring the granularity the
//! spec calls out: a malformed byte stream, a corrupt metadata block, a
//! corrupt chunk, an internal invariant violation, and I/O. `MissingTerm`
//! deliberately has no variant anywhere here — it is normal control flow
//! handled by the dispatcher, never an error.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum VByteError {
    #[error("VByte stream ended mid-integer")]
    Malformed,
}

#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    #[error("I/O error reading posting list: {0}")]
    Io(#[from] io::Error),

    #[error("malformed VByte stream in posting list: {0}")]
    Codec(#[from] VByteError),

    #[error("corrupt metadata block: {0}")]
    CorruptMetadata(String),

    #[error("corrupt chunk: {0}")]
    CorruptChunk(String),

    #[error("cursor invariant violated: {0}")]
    InvariantViolation(String),
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Cursor(#[from] CursorError),

    #[error("I/O error during query execution: {0}")]
    Io(#[from] io::Error),

    #[error("document store error: {0}")]
    DocumentStore(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error loading {what}: {source}")]
    Io {
        what: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("parse error in {what} at line {line}: {detail}")]
    Parse {
        what: &'static str,
        line: usize,
        detail: String,
    },
}
