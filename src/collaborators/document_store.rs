//! Document store: opaque string-in/string-out lookup keyed by docID.
//!
//! The spec names `"sqlite"` as the backend identifier the original opens
//! with, so the production implementation here is a thin `rusqlite`
//! wrapper expecting a `documents(doc_id INTEGER PRIMARY KEY, body TEXT)`
//! table. A line-file-backed store is also provided for tests and for
//! small corpora that don't warrant a database.

use std::path::Path;

use crate::error::QueryError;

pub trait DocumentStore {
    fn get(&self, did: u64) -> Result<Option<String>, QueryError>;
    fn close(&mut self);
}

/// SQLite-backed document store, keyed by the `kind` string `"sqlite"` the
/// original CLI opens with.
pub struct SqliteDocumentStore {
    conn: Option<rusqlite::Connection>,
}

impl SqliteDocumentStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, QueryError> {
        let conn = rusqlite::Connection::open(path)
            .map_err(|e| QueryError::DocumentStore(e.to_string()))?;
        Ok(Self { conn: Some(conn) })
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn get(&self, did: u64) -> Result<Option<String>, QueryError> {
        let conn = self
            .conn
            .as_ref()
            .ok_or_else(|| QueryError::DocumentStore("document store is closed".into()))?;
        conn.query_row(
            "SELECT body FROM documents WHERE doc_id = ?1",
            [did as i64],
            |row| row.get::<_, String>(0),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(QueryError::DocumentStore(other.to_string())),
        })
    }

    fn close(&mut self) {
        self.conn = None;
    }
}

/// In-memory document store, dense `Vec<String>` indexed by docID. Used by
/// tests and any corpus small enough to fit in memory without a database.
pub struct InMemoryDocumentStore {
    documents: Vec<String>,
}

impl InMemoryDocumentStore {
    pub fn new(documents: Vec<String>) -> Self {
        Self { documents }
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get(&self, did: u64) -> Result<Option<String>, QueryError> {
        Ok(self.documents.get(did as usize).cloned())
    }

    fn close(&mut self) {}
}
