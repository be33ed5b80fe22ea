use std::io::Read;
use std::path::Path;

use crate::TransferError;

/// One part-sized piece of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based position of this chunk in the file.
    pub index: u32,
    pub data: Vec<u8>,
}

impl Chunk {
    /// Size of this chunk in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

// ---------------------------------------------------------------------------
// ChunkReader
// ---------------------------------------------------------------------------

/// Reads a file sequentially in fixed-size chunks.
///
/// Every chunk is exactly `chunk_size` bytes except the last, which holds
/// whatever remains.
pub struct ChunkReader {
    file: std::fs::File,
    chunk_size: u64,
    offset: u64,
    index: u32,
    file_size: u64,
}

impl ChunkReader {
    /// Opens `path` for chunked reading.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn new(path: &Path, chunk_size: u64) -> Result<Self, TransferError> {
        assert!(chunk_size > 0, "chunk size must be positive");
        let file = std::fs::File::open(path)?;
        let file_size = file.metadata()?.len();
        Ok(Self {
            file,
            chunk_size,
            offset: 0,
            index: 0,
            file_size,
        })
    }

    /// Reads the next chunk. Returns `None` at EOF.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>, TransferError> {
        let remaining = self.remaining();
        if remaining == 0 {
            return Ok(None);
        }

        let read_size = remaining.min(self.chunk_size);
        let mut buf = Vec::with_capacity(read_size as usize);
        (&mut self.file).take(read_size).read_to_end(&mut buf)?;
        if buf.is_empty() {
            return Ok(None);
        }

        let chunk = Chunk {
            index: self.index,
            data: buf,
        };
        self.offset += chunk.size() as u64;
        self.index += 1;
        Ok(Some(chunk))
    }

    fn remaining(&self) -> u64 {
        self.file_size.saturating_sub(self.offset)
    }
}
