use crate::TransferError;

/// Number of parts a multipart upload of `file_size` bytes needs.
///
/// `ceil(file_size / chunk_size)`, except that an empty file is sent as a
/// single empty part so every upload has at least one part to complete.
///
/// # Panics
///
/// Panics if `chunk_size` is zero.
pub fn part_count(file_size: u64, chunk_size: u64) -> u64 {
    assert!(chunk_size > 0, "chunk size must be positive");
    file_size.div_ceil(chunk_size).max(1)
}

/// Byte layout of one multipart upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartPlan {
    pub file_size: u64,
    pub chunk_size: u64,
    pub parts: u64,
}

impl PartPlan {
    /// Plans the parts for a file of `file_size` bytes.
    pub fn new(file_size: u64, chunk_size: u64) -> Self {
        Self {
            file_size,
            chunk_size,
            parts: part_count(file_size, chunk_size),
        }
    }

    /// Length in bytes of part `index` (0-based), or `None` past the end.
    pub fn part_len(&self, index: u64) -> Option<u64> {
        if index >= self.parts {
            return None;
        }
        let start = index * self.chunk_size;
        Some((self.file_size - start.min(self.file_size)).min(self.chunk_size))
    }

    /// Checks that part `index` was read back with the planned length.
    ///
    /// A mismatch means the file changed size after the plan was made.
    pub fn check_part(&self, index: u32, len: u64) -> Result<(), TransferError> {
        match self.part_len(u64::from(index)) {
            Some(planned) if planned == len => Ok(()),
            expected => Err(TransferError::SizeChanged {
                part: index,
                expected,
                actual: len,
            }),
        }
    }
}
