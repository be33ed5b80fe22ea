//! Local-side primitives for multipart object transfer.
//!
//! Everything here touches only the local filesystem: reading a file in
//! part-sized chunks, planning part counts, tracking the parts of one
//! multipart upload, scanning a directory tree and validating the relative
//! paths that remote keys map onto.

mod chunked;
mod mime;
mod plan;
mod progress;
mod scan;
mod session;
mod validation;

pub use chunked::{Chunk, ChunkReader};
pub use mime::guess_content_type;
pub use plan::{PartPlan, part_count};
pub use progress::SpeedCalculator;
pub use scan::{LocalFile, scan_directory};
pub use session::{PresignedPart, UploadSession};
pub use validation::validate_relative_path;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("part {got} recorded out of order (expected part {expected})")]
    PartOutOfOrder { expected: u32, got: u32 },

    #[error("part index {0} has no 1-based part number")]
    PartNumberOverflow(u32),

    #[error("part {part} is {actual} bytes, planned {expected:?}; file changed during upload")]
    SizeChanged {
        part: u32,
        expected: Option<u64>,
        actual: u64,
    },

    #[error("upload incomplete: {recorded} of {planned} parts recorded")]
    IncompleteUpload { recorded: usize, planned: usize },
}
