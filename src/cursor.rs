//! Posting-list cursor: lazily decoded, skip-aware iteration over one
//! term's inverted list.
//!
//! Owns the list's metadata (chunk sizes and last-docID skip pointers),
//! the byte offset where chunk payloads begin, and the state of whichever
//! chunk is currently materialized. The only primitive callers need is
//! [`PostingCursor::next_geq`] — everything else (metadata parsing, chunk
//! decoding, the intra-chunk scan) is internal bookkeeping driven by it.

use std::sync::Arc;

use crate::collaborators::index_file::RandomAccessSource;
use crate::error::CursorError;
use crate::vbyte;

/// A cursor over one term's posting list.
///
/// Invariants (checked where cheap, documented where not):
/// - `curr_dids.len() == curr_freqs.len() <= chunk_size`.
/// - if `curr_dids` is non-empty, its last element equals `last_dids[curr_chunk_idx]`.
/// - `curr_did_idx < curr_dids.len()` immediately after a successful `next_geq`.
/// - `next_geq` is monotone: non-decreasing arguments yield non-decreasing results.
pub struct PostingCursor {
    source: Arc<dyn RandomAccessSource>,
    chunk_sizes: Vec<u64>,
    last_dids: Vec<u64>,
    chunk_start_pos: u64,
    curr_chunk_idx: usize,
    curr_dids: Vec<u64>,
    curr_freqs: Vec<u64>,
    curr_did_idx: usize,
    closed: bool,
}

impl PostingCursor {
    /// Opens a posting list at `inv_list_pos`, reading and VByte-decoding
    /// its `metadata_size`-byte metadata block.
    pub fn open(
        source: Arc<dyn RandomAccessSource>,
        inv_list_pos: u64,
        metadata_size: u64,
    ) -> Result<Self, CursorError> {
        let metadata_bytes = source.read_at(inv_list_pos, metadata_size as usize)?;
        let decoded = vbyte::decode(&metadata_bytes)?;

        let mut iter = decoded.iter();
        let num_chunk_sizes = *iter
            .next()
            .ok_or_else(|| CursorError::CorruptMetadata("empty metadata block".into()))?
            as usize;

        let mut chunk_sizes = Vec::with_capacity(num_chunk_sizes);
        for _ in 0..num_chunk_sizes {
            let v = *iter.next().ok_or_else(|| {
                CursorError::CorruptMetadata("declared chunk-size count exceeds payload".into())
            })?;
            chunk_sizes.push(v);
        }

        let num_last_dids = *iter.next().ok_or_else(|| {
            CursorError::CorruptMetadata("missing last-did count".into())
        })? as usize;

        let mut last_dids = Vec::with_capacity(num_last_dids);
        for _ in 0..num_last_dids {
            let v = *iter.next().ok_or_else(|| {
                CursorError::CorruptMetadata("declared last-did count exceeds payload".into())
            })?;
            last_dids.push(v);
        }

        if chunk_sizes.len() != 2 * last_dids.len() {
            return Err(CursorError::CorruptMetadata(format!(
                "numChunkSizes ({}) != 2 * numLastDids ({})",
                chunk_sizes.len(),
                last_dids.len()
            )));
        }
        if last_dids.is_empty() {
            return Err(CursorError::CorruptMetadata(
                "inverted list has no chunks".into(),
            ));
        }

        Ok(Self {
            source,
            chunk_sizes,
            last_dids,
            chunk_start_pos: inv_list_pos + metadata_size,
            curr_chunk_idx: 0,
            curr_dids: Vec::new(),
            curr_freqs: Vec::new(),
            curr_did_idx: 0,
            closed: false,
        })
    }

    /// Number of chunks in this list — the spec's stand-in for `f_t` (see
    /// module docs in [`crate::bm25`] for why this is an approximation and
    /// why it is kept rather than fixed).
    pub fn get_num_did(&self) -> usize {
        self.last_dids.len()
    }

    /// Frequency paired with the docID `next_geq` most recently returned.
    /// Only meaningful immediately after a successful `next_geq`.
    pub fn get_freq(&self) -> u64 {
        self.curr_freqs[self.curr_did_idx]
    }

    /// Advances to the smallest docID >= `k`, or `None` if the list is
    /// exhausted. Skip-scans chunk metadata before ever decoding a chunk,
    /// so a chunk whose `last_did < k` is never materialized.
    pub fn next_geq(&mut self, k: u64) -> Result<Option<u64>, CursorError> {
        // Phase 1: skip scan over chunk metadata.
        let mut num_skip_bytes: u64 = 0;
        let mut target_chunk = 0usize;
        while target_chunk < self.last_dids.len() && self.last_dids[target_chunk] < k {
            num_skip_bytes +=
                self.chunk_sizes[target_chunk * 2] + self.chunk_sizes[target_chunk * 2 + 1];
            target_chunk += 1;
        }
        if target_chunk == self.last_dids.len() {
            return Ok(None);
        }

        // Phase 2: materialize the target chunk if it isn't already loaded.
        if self.curr_dids.is_empty() || target_chunk != self.curr_chunk_idx {
            let did_size = self.chunk_sizes[target_chunk * 2] as usize;
            let freq_size = self.chunk_sizes[target_chunk * 2 + 1] as usize;

            let did_bytes = self
                .source
                .read_at(self.chunk_start_pos + num_skip_bytes, did_size)?;
            let curr_dids = vbyte::decode(&did_bytes)?;

            let freq_bytes = self.source.read_at(
                self.chunk_start_pos + num_skip_bytes + did_size as u64,
                freq_size,
            )?;
            let curr_freqs = vbyte::decode(&freq_bytes)?;

            if curr_dids.len() != curr_freqs.len() {
                return Err(CursorError::CorruptChunk(format!(
                    "chunk {target_chunk}: did count {} != freq count {}",
                    curr_dids.len(),
                    curr_freqs.len()
                )));
            }
            if curr_dids.len() > 128 {
                return Err(CursorError::CorruptChunk(format!(
                    "chunk {target_chunk} decodes to {} postings, exceeds 128",
                    curr_dids.len()
                )));
            }

            self.curr_dids = curr_dids;
            self.curr_freqs = curr_freqs;
            self.curr_chunk_idx = target_chunk;
            self.curr_did_idx = 0;
        }

        // Phase 3: intra-chunk linear scan.
        while self.curr_did_idx < self.curr_dids.len() && self.curr_dids[self.curr_did_idx] < k {
            self.curr_did_idx += 1;
        }

        if self.curr_did_idx >= self.curr_dids.len() {
            return Err(CursorError::InvariantViolation(format!(
                "chunk {target_chunk} has last_did >= {k} but no element satisfies the predicate"
            )));
        }

        Ok(Some(self.curr_dids[self.curr_did_idx]))
    }

    /// Releases the backing source handle. Idempotent.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl Drop for PostingCursor {
    fn drop(&mut self) {
        self.close();
    }
}
