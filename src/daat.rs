//! Document-at-a-time traversal: drives a set of posting-list cursors in
//! lock-step to enumerate matching docIDs under conjunction or disjunction,
//! scoring each hit and keeping a bounded top-K heap.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::bm25;
use crate::config::Bm25Params;
use crate::cursor::PostingCursor;
use crate::error::QueryError;

/// A single ranked hit: BM25 score paired with its docID.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocScore {
    pub score: f32,
    pub did: u64,
}

impl Eq for DocScore {}

impl Ord for DocScore {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.score
            .partial_cmp(&other.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| self.did.cmp(&other.did))
    }
}

impl PartialOrd for DocScore {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Bounded max-heap ordered so the *weakest* survivor sits at the root,
/// letting a losing score be popped in O(log K). Mirrors the teacher's
/// `BinaryHeap<Reverse<(OrderedFloat, u32)>>` top-K pattern.
pub struct TopKHeap {
    heap: BinaryHeap<Reverse<DocScore>>,
    k: usize,
}

impl TopKHeap {
    pub fn new(k: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(k + 1),
            k,
        }
    }

    pub fn push(&mut self, entry: DocScore) {
        self.heap.push(Reverse(entry));
        while self.heap.len() > self.k {
            self.heap.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drains the heap, returning hits in descending-score order.
    pub fn into_ranked_vec(self) -> Vec<DocScore> {
        let mut ascending: Vec<DocScore> = self.heap.into_sorted_vec().into_iter().map(|Reverse(d)| d).collect();
        ascending.reverse();
        ascending
    }
}

/// Per-document BM25 contribution, access to per-term collection
/// statistics needed by [`crate::bm25::score_term`].
pub struct Scorer<'a> {
    pub bm25: Bm25Params,
    pub n: f32,
    pub avg_doc_len: f32,
    pub doc_len: &'a dyn Fn(u64) -> f32,
}

impl Scorer<'_> {
    fn score_cursor(&self, cursor: &PostingCursor, did: u64) -> f32 {
        let doc_len = (self.doc_len)(did);
        bm25::score_term(
            cursor.get_freq() as f32,
            cursor.get_num_did() as f32,
            self.n,
            doc_len,
            self.avg_doc_len,
            self.bm25,
        )
    }
}

/// Sorts cursors by ascending list length (`get_num_did()`, the chunk-count
/// proxy for `f_t`) so [`conjunctive`] leapfrogs off the shortest list
/// first. Pure optimization: the emitted docID set is unaffected by cursor
/// order, only how much skip-scanning the traversal does to reach it. Call
/// this before `conjunctive`, never from inside it.
pub fn sort_cursors_by_length(cursors: &mut [PostingCursor]) {
    cursors.sort_unstable_by_key(|c| c.get_num_did());
}

/// Conjunctive (AND) traversal: produces exactly those docIDs present in
/// every cursor's list, using leapfrog advance on mismatch.
pub fn conjunctive(
    cursors: &mut [PostingCursor],
    scorer: &Scorer,
    heap: &mut TopKHeap,
) -> Result<(), QueryError> {
    if cursors.is_empty() {
        return Ok(());
    }

    let mut did = 0u64;
    loop {
        let candidate = match cursors[0].next_geq(did)? {
            Some(d) => d,
            None => break,
        };

        let mut agreed = candidate;
        for cursor in &mut cursors[1..] {
            let d = cursor.next_geq(candidate)?;
            match d {
                Some(d) if d == candidate => continue,
                Some(d) => {
                    agreed = d;
                    break;
                }
                None => return Ok(()),
            }
        }

        if agreed == candidate {
            let score = cursors.iter().map(|c| scorer.score_cursor(c, candidate)).sum();
            heap.push(DocScore { score, did: candidate });
            did = candidate + 1;
        } else {
            did = agreed;
        }
    }

    Ok(())
}

/// Disjunctive (OR) traversal: produces every docID present in at least one
/// cursor's list, each exactly once, in ascending order. Only cursors
/// positioned exactly at the emitted docID contribute their frequency —
/// a cursor parked past `did` contributes zero, correcting the reference
/// implementation's bug of scoring every cursor unconditionally.
pub fn disjunctive(
    cursors: &mut [PostingCursor],
    scorer: &Scorer,
    heap: &mut TopKHeap,
) -> Result<(), QueryError> {
    if cursors.is_empty() {
        return Ok(());
    }

    let mut did = 0u64;
    loop {
        let mut candidates = Vec::with_capacity(cursors.len());
        for cursor in cursors.iter_mut() {
            candidates.push(cursor.next_geq(did)?);
        }

        let min = candidates.iter().flatten().min().copied();
        let Some(min) = min else {
            break;
        };

        let score = cursors
            .iter()
            .zip(candidates.iter())
            .filter(|(_, c)| **c == Some(min))
            .map(|(cursor, _)| scorer.score_cursor(cursor, min))
            .sum();
        heap.push(DocScore { score, did: min });

        did = min + 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::index_file::InMemorySource;
    use crate::config::Bm25Params;
    use std::sync::Arc;

    /// Builds a single-chunk posting list's on-disk bytes plus its metadata
    /// block length, matching the layout in §3.
    fn build_single_chunk(dids: &[u64], freqs: &[u64]) -> (Vec<u8>, u64) {
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

    fn cursor_for(dids: Vec<u64>, freqs: Vec<u64>) -> PostingCursor {
        let (bytes, metadata_size) = build_single_chunk(&dids, &freqs);
        let source: Arc<dyn crate::collaborators::index_file::RandomAccessSource> =
            Arc::new(InMemorySource(bytes));
        PostingCursor::open(source, 0, metadata_size).unwrap()
    }

    /// Builds a cursor whose list spans `chunks` (one `(dids, freqs)` pair
    /// per chunk), so `get_num_did()` reports more than one chunk.
    fn cursor_for_chunks(chunks: &[(Vec<u64>, Vec<u64>)]) -> PostingCursor {
        use crate::vbyte;
        let mut chunk_sizes = Vec::new();
        let mut last_dids = Vec::new();
        let mut payload = Vec::new();
        for (dids, freqs) in chunks {
            let did_bytes = vbyte::encode(dids);
            let freq_bytes = vbyte::encode(freqs);
            chunk_sizes.push(did_bytes.len() as u64);
            chunk_sizes.push(freq_bytes.len() as u64);
            last_dids.push(*dids.last().unwrap());
            payload.extend(did_bytes);
            payload.extend(freq_bytes);
        }
        let mut metadata_numbers = vec![chunk_sizes.len() as u64];
        metadata_numbers.extend(&chunk_sizes);
        metadata_numbers.push(last_dids.len() as u64);
        metadata_numbers.extend(&last_dids);
        let metadata_bytes = vbyte::encode(&metadata_numbers);
        let metadata_size = metadata_bytes.len() as u64;

        let mut full = metadata_bytes;
        full.extend(payload);
        let source: Arc<dyn crate::collaborators::index_file::RandomAccessSource> =
            Arc::new(InMemorySource(full));
        PostingCursor::open(source, 0, metadata_size).unwrap()
    }

    #[test]
    fn conjunctive_matches_intersection() {
        // cat: docs 0, 2, 3 ; dog: docs 1, 3
        let cat = cursor_for(vec![0, 2, 3], vec![1, 1, 2]);
        let dog = cursor_for(vec![1, 3], vec![1, 1]);

        let doc_len = |_: u64| 11.0f32;
        let scorer = Scorer {
            bm25: Bm25Params::default(),
            n: 4.0,
            avg_doc_len: 11.0,
            doc_len: &doc_len,
        };
        let mut heap = TopKHeap::new(10);
        let mut cursors = vec![cat, dog];
        conjunctive(&mut cursors, &scorer, &mut heap).unwrap();

        let ranked = heap.into_ranked_vec();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].did, 3);
    }

    #[test]
    fn length_sort_does_not_change_intersection_result() {
        // "cat" spans 3 chunks (longer), "dog" is a single chunk (shorter) —
        // sorting must put dog first without changing which docID is emitted.
        let cat = cursor_for_chunks(&[
            (vec![0], vec![1]),
            (vec![2], vec![1]),
            (vec![3], vec![2]),
        ]);
        let dog = cursor_for(vec![1, 3], vec![1, 1]);
        assert_eq!(cat.get_num_did(), 3);
        assert_eq!(dog.get_num_did(), 1);

        let doc_len = |_: u64| 11.0f32;
        let scorer = Scorer {
            bm25: Bm25Params::default(),
            n: 4.0,
            avg_doc_len: 11.0,
            doc_len: &doc_len,
        };
        let mut heap = TopKHeap::new(10);
        let mut cursors = vec![cat, dog];
        sort_cursors_by_length(&mut cursors);
        assert_eq!(cursors[0].get_num_did(), 1, "shorter list must sort first");

        conjunctive(&mut cursors, &scorer, &mut heap).unwrap();
        let ranked = heap.into_ranked_vec();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].did, 3);
    }

    #[test]
    fn disjunctive_matches_union_without_duplicates() {
        let cat = cursor_for(vec![0, 2, 3], vec![1, 1, 2]);
        let dog = cursor_for(vec![1, 3], vec![1, 1]);

        let doc_len = |_: u64| 11.0f32;
        let scorer = Scorer {
            bm25: Bm25Params::default(),
            n: 4.0,
            avg_doc_len: 11.0,
            doc_len: &doc_len,
        };
        let mut heap = TopKHeap::new(10);
        let mut cursors = vec![cat, dog];
        disjunctive(&mut cursors, &scorer, &mut heap).unwrap();

        let ranked = heap.into_ranked_vec();
        let mut dids: Vec<u64> = ranked.iter().map(|d| d.did).collect();
        dids.sort_unstable();
        assert_eq!(dids, vec![0, 1, 2, 3]);
    }
}
