use std::path::{Path, PathBuf};

use msalign_protocol::RemoteLocator;
use msalign_protocol::constants::LOCATOR_PREFIX;
use msalign_proxy::{ProxyError, RemoteStore};
use msalign_transfer::validate_relative_path;
use tracing::info;

use crate::{AlignError, Aligner, AlignmentMode};

/// File name of the alignment when the caller gives none.
pub const DEFAULT_OUTPUT_NAME: &str = "alignment_mafft.fa";

/// Fallback local name for an input locator that ends in `/`.
const INPUT_FALLBACK_NAME: &str = "unaligned.fa";

/// Inputs of one alignment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignRequest {
    /// Locator of the unaligned FASTA file.
    pub input: String,
    pub mode: AlignmentMode,
    /// Output file name, relative to `work_dir` and to the output prefix.
    pub output_name: Option<String>,
    /// Local directory for the downloaded input and the alignment.
    pub work_dir: PathBuf,
}

impl AlignRequest {
    pub fn new(input: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            mode: AlignmentMode::default(),
            output_name: None,
            work_dir: work_dir.into(),
        }
    }

    pub fn with_mode(mut self, mode: AlignmentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }
}

/// A file that exists both locally and at a remote locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedOutput {
    pub local_path: PathBuf,
    pub locator: RemoteLocator,
}

/// Resolves where an alignment is written locally and stored remotely.
///
/// Without a name the file is [`DEFAULT_OUTPUT_NAME`]. A leading `/` on the
/// name is dropped. The remote side lives under `latch:///`, or under
/// `prefix_override` when one is configured.
pub fn output_target(
    work_dir: &Path,
    output_name: Option<&str>,
    prefix_override: Option<&str>,
) -> Result<AlignedOutput, AlignError> {
    let raw = output_name
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_OUTPUT_NAME);
    let name = raw.trim_start_matches('/');
    if name.ends_with('/') || validate_relative_path(name).is_err() {
        return Err(AlignError::InvalidOutput(raw.to_string()));
    }

    let base = match prefix_override {
        Some(prefix) => RemoteLocator::parse_directory(prefix)
            .map_err(|_| AlignError::InvalidOutput(prefix.to_string()))?,
        None => RemoteLocator::parse(LOCATOR_PREFIX).map_err(ProxyError::from)?,
    };

    Ok(AlignedOutput {
        local_path: work_dir.join(name),
        locator: base.with_trailing_slash().join(name),
    })
}

/// Downloads `request.input`, aligns it and uploads the result.
pub async fn run_alignment_task(
    store: &dyn RemoteStore,
    aligner: &Aligner,
    request: &AlignRequest,
) -> Result<AlignedOutput, AlignError> {
    let input = RemoteLocator::parse(request.input.as_str()).map_err(ProxyError::from)?;
    let target = output_target(
        &request.work_dir,
        request.output_name.as_deref(),
        store.output_prefix_override(),
    )?;

    // Inputs get their own directory so an output name can never clobber one.
    let input_dir = request.work_dir.join("input");
    tokio::fs::create_dir_all(&input_dir).await?;
    let input_path = input_dir.join(input.file_name().unwrap_or(INPUT_FALLBACK_NAME));
    store.download(input.as_str(), &input_path).await?;

    if let Some(parent) = target.local_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    aligner
        .align(request.mode, &input_path, &target.local_path)
        .await?;

    store
        .upload(&target.local_path, target.locator.as_str())
        .await?;

    info!(
        input = %input,
        mode = %request.mode,
        output = %target.locator,
        path = %target.local_path.display(),
        "alignment uploaded"
    );
    Ok(target)
}
