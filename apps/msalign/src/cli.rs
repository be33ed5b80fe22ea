use std::path::PathBuf;

use clap::{Parser, Subcommand};
use msalign_align::AlignmentMode;

/// Move files to and from latch object storage and align sequences with MAFFT.
#[derive(Debug, Parser)]
#[command(name = "msalign", version)]
pub struct Cli {
    /// Config file (default: ~/.config/msalign/latch.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Control-plane endpoint, overriding config and environment.
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Multipart upload part size, overriding config and environment.
    #[arg(long, global = true, value_name = "BYTES")]
    pub chunk_size: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print whether an object exists.
    Exists { locator: String },

    /// Download one object.
    Download { locator: String, path: PathBuf },

    /// Download every object under a prefix.
    DownloadDir { locator: String, dir: PathBuf },

    /// Upload one file.
    Upload { path: PathBuf, locator: String },

    /// Upload every file under a local directory.
    UploadDir { dir: PathBuf, locator: String },

    /// Align a remote FASTA file with MAFFT and upload the alignment.
    Align {
        /// Locator of the unaligned sequences.
        input: String,

        /// Alignment strategy: auto, L-INS-i or FFT-NS-2.
        #[arg(long, default_value_t = AlignmentMode::Auto)]
        mode: AlignmentMode,

        /// Output file name (default: alignment_mafft.fa).
        #[arg(long, value_name = "NAME")]
        output: Option<String>,

        /// MAFFT executable to run instead of the wrappers on PATH.
        #[arg(long, value_name = "PROGRAM")]
        mafft: Option<PathBuf>,

        /// Local working directory.
        #[arg(long, default_value = ".", value_name = "DIR")]
        work_dir: PathBuf,
    },
}
