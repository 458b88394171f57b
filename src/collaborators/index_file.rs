//! Random-access byte source over the inverted-index file.
//!
//! Posting-list cursors never need the whole file resident at once — they
//! seek to a byte offset and read a handful of bytes per chunk. Memory-
//! mapping the file turns that into a slice copy with no syscall per read,
//! the same trick the teacher's ensemble profile uses for its FST term
//! dictionary.

use memmap2::Mmap;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// A read-only, randomly-addressable byte source.
///
/// Cursors hold an `Arc<dyn RandomAccessSource>` so many cursors can share
/// one open file; each cursor tracks its own logical offset, and the
/// single-threaded query model means concurrent reads never race.
pub trait RandomAccessSource: Send + Sync {
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>>;
}

/// Memory-mapped inverted-index file.
pub struct IndexFile {
    mmap: Mmap,
}

impl IndexFile {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Arc<Self>> {
        let file = File::open(path)?;
        // SAFETY: the file is not expected to be mutated by another process
        // while this read-only query process holds it open.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Arc::new(Self { mmap }))
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}

impl RandomAccessSource for IndexFile {
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        let start = offset as usize;
        let end = start
            .checked_add(len)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "offset overflow"))?;
        if end > self.mmap.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "read [{start}, {end}) out of bounds for index file of length {}",
                    self.mmap.len()
                ),
            ));
        }
        Ok(self.mmap[start..end].to_vec())
    }
}

/// In-memory source used by unit tests so cursor behavior can be exercised
/// without writing temp files.
#[cfg(test)]
pub struct InMemorySource(pub Vec<u8>);

#[cfg(test)]
impl RandomAccessSource for InMemorySource {
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        let start = offset as usize;
        let end = start + len;
        if end > self.0.len() {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "out of bounds"));
        }
        Ok(self.0[start..end].to_vec())
    }
}
