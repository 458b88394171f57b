//! URL table loader: `docID url documentLen`, one record per line, densely
//! indexed by docID starting at 0. Derives the collection statistics (`N`,
//! `D_AVG`) the BM25 scorer needs.

use std::fs;
use std::path::Path;

use crate::error::LoadError;

#[derive(Debug, Clone)]
pub struct UrlEntry {
    pub url: String,
    pub document_len: u64,
}

pub struct UrlTable {
    entries: Vec<UrlEntry>,
    avg_doc_len: f32,
}

impl UrlTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let text = fs::read_to_string(&path).map_err(|e| LoadError::Io {
            what: "urlTable",
            source: e,
        })?;

        let mut entries = Vec::new();
        let mut total_len: u64 = 0;
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let did: usize = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| LoadError::Parse {
                    what: "urlTable",
                    line: idx + 1,
                    detail: "missing or invalid docID".into(),
                })?;
            let url = parts.next().ok_or_else(|| LoadError::Parse {
                what: "urlTable",
                line: idx + 1,
                detail: "missing url".into(),
            })?;
            let document_len: u64 = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| LoadError::Parse {
                    what: "urlTable",
                    line: idx + 1,
                    detail: "missing or invalid documentLen".into(),
                })?;

            if did != entries.len() {
                return Err(LoadError::Parse {
                    what: "urlTable",
                    line: idx + 1,
                    detail: format!("docID {did} out of dense order, expected {}", entries.len()),
                });
            }

            total_len += document_len;
            entries.push(UrlEntry {
                url: url.to_string(),
                document_len,
            });
        }

        let avg_doc_len = if entries.is_empty() {
            0.0
        } else {
            total_len as f32 / entries.len() as f32
        };

        Ok(Self {
            entries,
            avg_doc_len,
        })
    }

    /// `N`: collection size.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// `D_AVG`: mean document length across the corpus.
    pub fn average_document_length(&self) -> f32 {
        self.avg_doc_len
    }

    pub fn get(&self, did: u64) -> Option<&UrlEntry> {
        self.entries.get(did as usize)
    }
}
