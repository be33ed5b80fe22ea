//! MAFFT multiple-sequence-alignment step.
//!
//! Downloads unaligned sequences from remote storage, runs MAFFT with the
//! requested strategy and uploads the alignment back.

mod aligner;
mod mode;
mod task;

pub use aligner::{Aligner, DEFAULT_LINSI_PROGRAM, DEFAULT_MAFFT_PROGRAM};
pub use mode::{AlignmentMode, ParseModeError};
pub use task::{AlignRequest, AlignedOutput, DEFAULT_OUTPUT_NAME, output_target, run_alignment_task};

/// Errors produced by the alignment step.
#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("`{program}` exited with {}: {stderr}", exit_label(.code))]
    ToolFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error(transparent)]
    Store(#[from] msalign_proxy::ProxyError),

    #[error("invalid output name `{0}`")]
    InvalidOutput(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "a signal".to_string(),
    }
}
