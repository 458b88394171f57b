//! Query dispatcher: parses a raw query line, opens the cursors it names,
//! drives the matching DAAT traversal, and turns the resulting heap into
//! ranked, retrievable hits. The only piece of this crate that knows how
//! all the collaborators (C6) and the core (C1-C4) fit together.

use std::sync::Arc;

use crate::collaborators::{DocumentStore, IndexFile, Lexicon, UrlTable};
#[cfg(test)]
use crate::collaborators::InMemoryDocumentStore;
use crate::config::EngineConfig;
use crate::cursor::PostingCursor;
use crate::daat::{self, Scorer, TopKHeap};
use crate::error::QueryError;
use crate::result::RankedHit;
use crate::collaborators::snippet;

/// How a query's terms should be combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

/// Splits `raw` on every occurrence of one literal marker, preferring
/// `" and "` over `" or "` when both are present. No tokenizing, no
/// trimming beyond the marker itself — a direct port of the original
/// `QueryProcessor::parseQuery`, which collects *all* marker positions and
/// splits into N+1 terms rather than stopping at the first one.
pub fn parse_query(raw: &str) -> (Connective, Vec<String>) {
    if raw.contains(" and ") {
        return (Connective::And, split_on_marker(raw, " and "));
    }
    if raw.contains(" or ") {
        return (Connective::Or, split_on_marker(raw, " or "));
    }
    (Connective::And, vec![raw.to_string()])
}

/// Splits `raw` on every occurrence of `marker`, the way the original's
/// `parseQuery` walks `find(marker, pos+1)` in a loop: collect all match
/// positions first, then slice the N+1 substrings between them.
fn split_on_marker(raw: &str, marker: &str) -> Vec<String> {
    let mut positions = Vec::new();
    let mut pos = 0;
    while let Some(found) = raw[pos..].find(marker) {
        let abs = pos + found;
        positions.push(abs);
        pos = abs + 1;
    }

    let mut terms = Vec::with_capacity(positions.len() + 1);
    let mut i = 0;
    for p in positions {
        terms.push(raw[i..p].to_string());
        i = p + marker.len();
    }
    terms.push(raw[i..].to_string());
    terms
}

/// Ties the lexicon, index file, URL table, document store, and snippet
/// extractor together behind the traversal in [`crate::daat`].
pub struct Dispatcher {
    lexicon: Lexicon,
    url_table: UrlTable,
    index_file: Arc<IndexFile>,
    document_store: Box<dyn DocumentStore>,
    config: EngineConfig,
}

impl Dispatcher {
    pub fn new(
        lexicon: Lexicon,
        url_table: UrlTable,
        index_file: Arc<IndexFile>,
        document_store: Box<dyn DocumentStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            lexicon,
            url_table,
            index_file,
            document_store,
            config,
        }
    }

    /// Opens a cursor for every term found in the lexicon, skipping terms
    /// that aren't present — callers compare the returned count against
    /// `terms.len()` to tell "some terms missing" from "all terms present".
    fn open_cursors(&self, terms: &[String]) -> Result<Vec<PostingCursor>, QueryError> {
        let mut cursors = Vec::with_capacity(terms.len());
        for term in terms {
            if let Some(entry) = self.lexicon.lookup(term) {
                let cursor = PostingCursor::open(
                    self.index_file.clone() as Arc<dyn crate::collaborators::RandomAccessSource>,
                    entry.inv_list_pos,
                    entry.metadata_size,
                )?;
                cursors.push(cursor);
            }
        }
        Ok(cursors)
    }

    /// Runs one query end to end: parse, cursor open, DAAT traversal,
    /// document retrieval, snippet extraction.
    pub fn execute(&self, raw: &str) -> Result<Vec<RankedHit>, QueryError> {
        let (connective, terms) = parse_query(raw);
        let n = self.url_table.size() as f32;
        let avg_doc_len = self.url_table.average_document_length();
        let doc_len = |did: u64| -> f32 {
            self.url_table
                .get(did)
                .map(|e| e.document_len as f32)
                .unwrap_or(avg_doc_len)
        };
        let scorer = Scorer {
            bm25: self.config.bm25,
            n,
            avg_doc_len,
            doc_len: &doc_len,
        };

        let mut heap = TopKHeap::new(self.config.top_k);

        match connective {
            Connective::And => {
                let mut cursors = self.open_cursors(&terms)?;
                if cursors.len() == terms.len() {
                    daat::sort_cursors_by_length(&mut cursors);
                    daat::conjunctive(&mut cursors, &scorer, &mut heap)?;
                }
                // A missing term under AND can never match anything; the
                // heap stays empty rather than erroring.
            }
            Connective::Or => {
                let mut cursors = self.open_cursors(&terms)?;
                daat::disjunctive(&mut cursors, &scorer, &mut heap)?;
            }
        }

        let ranked = heap.into_ranked_vec();
        let mut hits = Vec::with_capacity(ranked.len());
        for doc_score in ranked {
            let url = self
                .url_table
                .get(doc_score.did)
                .map(|e| e.url.clone())
                .unwrap_or_default();
            let body = self.document_store.get(doc_score.did)?;
            let snippet = body.as_deref().and_then(|text| snippet::snippet(&terms, text));
            hits.push(RankedHit {
                did: doc_score.did,
                url,
                score: doc_score.score,
                snippet,
            });
        }

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_query_prefers_and_over_or() {
        let (connective, terms) = parse_query("cat and dog");
        assert_eq!(connective, Connective::And);
        assert_eq!(terms, vec!["cat".to_string(), "dog".to_string()]);
    }

    #[test]
    fn parse_query_falls_back_to_or() {
        let (connective, terms) = parse_query("cat or dog");
        assert_eq!(connective, Connective::Or);
        assert_eq!(terms, vec!["cat".to_string(), "dog".to_string()]);
    }

    #[test]
    fn parse_query_single_term_is_conjunctive() {
        let (connective, terms) = parse_query("cat");
        assert_eq!(connective, Connective::And);
        assert_eq!(terms, vec!["cat".to_string()]);
    }

    #[test]
    fn parse_query_splits_every_marker_occurrence() {
        let (connective, terms) = parse_query("the and cat and dog");
        assert_eq!(connective, Connective::And);
        assert_eq!(
            terms,
            vec!["the".to_string(), "cat".to_string(), "dog".to_string()]
        );

        let (connective, terms) = parse_query("the or cat or dog or bird");
        assert_eq!(connective, Connective::Or);
        assert_eq!(
            terms,
            vec![
                "the".to_string(),
                "cat".to_string(),
                "dog".to_string(),
                "bird".to_string(),
            ]
        );
    }

    /// Builds a single-chunk posting list's on-disk bytes (metadata block
    /// followed by did/freq chunk payload), mirroring §3's layout, and
    /// returns the metadata block's length alongside it.
    fn encode_posting_list(dids: &[u64], freqs: &[u64]) -> (Vec<u8>, u64) {
        use crate::vbyte;
        let did_bytes = vbyte::encode(dids);
        let freq_bytes = vbyte::encode(freqs);
        let chunk_sizes = vec![did_bytes.len() as u64, freq_bytes.len() as u64];
        let last_dids = vec![*dids.last().unwrap()];

        let mut metadata_numbers = vec![chunk_sizes.len() as u64];
        metadata_numbers.extend(&chunk_sizes);
        metadata_numbers.push(last_dids.len() as u64);
        metadata_numbers.extend(&last_dids);
        let metadata_bytes = vbyte::encode(&metadata_numbers);
        let metadata_size = metadata_bytes.len() as u64;

        let mut full = metadata_bytes;
        full.extend(did_bytes);
        full.extend(freq_bytes);
        (full, metadata_size)
    }

    /// The spec's four-toy-document corpus: d0="the cat sat" (len 11),
    /// d1="the dog ran" (len 11), d2="a cat ran" (len 9),
    /// d3="the the cat dog" (len 15).
    struct Fixture {
        dispatcher: Dispatcher,
        _index_file: tempfile::NamedTempFile,
        _lexicon_file: tempfile::NamedTempFile,
        _url_file: tempfile::NamedTempFile,
    }

    fn build_fixture() -> Fixture {
        use std::io::Write as _;

        let postings: Vec<(&str, Vec<u64>, Vec<u64>)> = vec![
            ("cat", vec![0, 2, 3], vec![1, 1, 1]),
            ("dog", vec![1, 3], vec![1, 1]),
            ("the", vec![0, 1, 3], vec![1, 1, 2]),
        ];

        let mut index_bytes = Vec::new();
        let mut lexicon_lines = String::new();
        for (term, dids, freqs) in &postings {
            let pos = index_bytes.len() as u64;
            let (encoded, metadata_size) = encode_posting_list(dids, freqs);
            index_bytes.extend(&encoded);
            lexicon_lines.push_str(&format!("{term} {pos} {metadata_size}\n"));
        }

        let mut index_file = tempfile::NamedTempFile::new().unwrap();
        index_file.write_all(&index_bytes).unwrap();
        index_file.flush().unwrap();

        let mut lexicon_file = tempfile::NamedTempFile::new().unwrap();
        lexicon_file.write_all(lexicon_lines.as_bytes()).unwrap();
        lexicon_file.flush().unwrap();

        let mut url_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(url_file, "0 http://d0.example 11").unwrap();
        writeln!(url_file, "1 http://d1.example 11").unwrap();
        writeln!(url_file, "2 http://d2.example 9").unwrap();
        writeln!(url_file, "3 http://d3.example 15").unwrap();
        url_file.flush().unwrap();

        let url_table = UrlTable::load(url_file.path()).unwrap();
        let lexicon = Lexicon::load(lexicon_file.path()).unwrap();
        let index = IndexFile::open(index_file.path()).unwrap();
        let store = Box::new(InMemoryDocumentStore::new(Vec::new()));

        let dispatcher = Dispatcher::new(lexicon, url_table, index, store, EngineConfig::default());
        Fixture {
            dispatcher,
            _index_file: index_file,
            _lexicon_file: lexicon_file,
            _url_file: url_file,
        }
    }

    #[test]
    fn conjunctive_query_returns_only_the_shared_document() {
        let fixture = build_fixture();
        let hits = fixture.dispatcher.execute("cat and dog").unwrap();
        assert_eq!(hits.iter().map(|h| h.did).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn three_term_conjunctive_query_intersects_all_terms() {
        let fixture = build_fixture();
        let hits = fixture.dispatcher.execute("the and cat and dog").unwrap();
        assert_eq!(hits.iter().map(|h| h.did).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn disjunctive_query_ranks_the_doc_with_both_terms_first() {
        let fixture = build_fixture();
        let hits = fixture.dispatcher.execute("cat or dog").unwrap();
        let mut dids: Vec<u64> = hits.iter().map(|h| h.did).collect();
        assert_eq!(hits[0].did, 3);
        dids.sort_unstable();
        assert_eq!(dids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn conjunctive_query_with_missing_term_is_empty() {
        let fixture = build_fixture();
        let hits = fixture.dispatcher.execute("zebra and cat").unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn disjunctive_query_with_missing_term_falls_back_to_present_terms() {
        let fixture = build_fixture();
        let hits = fixture.dispatcher.execute("zebra or cat").unwrap();
        let mut dids: Vec<u64> = hits.iter().map(|h| h.did).collect();
        dids.sort_unstable();
        assert_eq!(dids, vec![0, 2, 3]);
    }

    #[test]
    fn single_term_query_is_treated_as_conjunctive() {
        let fixture = build_fixture();
        let hits = fixture.dispatcher.execute("the").unwrap();
        let mut dids: Vec<u64> = hits.iter().map(|h| h.did).collect();
        dids.sort_unstable();
        assert_eq!(dids, vec![0, 1, 3]);
    }
}
