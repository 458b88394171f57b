//! Lexicon loader: `term invListPos metadataSize`, one record per line.
//!
//! Trivial line-oriented parser, as the spec describes it — loaded once at
//! startup and treated as read-only thereafter.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::LoadError;

#[derive(Debug, Clone, Copy)]
pub struct LexiconEntry {
    pub inv_list_pos: u64,
    pub metadata_size: u64,
}

pub struct Lexicon {
    entries: HashMap<String, LexiconEntry>,
}

impl Lexicon {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let text = fs::read_to_string(&path).map_err(|e| LoadError::Io {
            what: "lexicon",
            source: e,
        })?;

        let mut entries = HashMap::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let term = parts.next().ok_or_else(|| LoadError::Parse {
                what: "lexicon",
                line: idx + 1,
                detail: "missing term".into(),
            })?;
            let inv_list_pos: u64 = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| LoadError::Parse {
                    what: "lexicon",
                    line: idx + 1,
                    detail: "missing or invalid invListPos".into(),
                })?;
            let metadata_size: u64 = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| LoadError::Parse {
                    what: "lexicon",
                    line: idx + 1,
                    detail: "missing or invalid metadataSize".into(),
                })?;

            entries.insert(
                term.to_string(),
                LexiconEntry {
                    inv_list_pos,
                    metadata_size,
                },
            );
        }

        Ok(Self { entries })
    }

    pub fn lookup(&self, term: &str) -> Option<LexiconEntry> {
        self.entries.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
