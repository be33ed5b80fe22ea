use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use tracing::{debug, warn};

use crate::{AlignError, AlignmentMode};

pub const DEFAULT_MAFFT_PROGRAM: &str = "mafft";
pub const DEFAULT_LINSI_PROGRAM: &str = "mafft-linsi";

/// Runs MAFFT as a subprocess.
#[derive(Debug, Clone, Default)]
pub struct Aligner {
    program: Option<OsString>,
}

impl Aligner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `program` for every mode instead of the MAFFT wrappers on `PATH`.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: Some(program.into()),
        }
    }

    /// Program and arguments for aligning `input` with `mode`.
    pub fn command_line(&self, mode: AlignmentMode, input: &Path) -> (OsString, Vec<OsString>) {
        let (default_program, flags): (&str, &[&str]) = match mode {
            AlignmentMode::LInsI => (DEFAULT_LINSI_PROGRAM, &[]),
            AlignmentMode::FftNs2 => (DEFAULT_MAFFT_PROGRAM, &[]),
            AlignmentMode::Auto => (DEFAULT_MAFFT_PROGRAM, &["--auto"]),
        };
        let program = self
            .program
            .clone()
            .unwrap_or_else(|| default_program.into());

        let mut args: Vec<OsString> = flags.iter().map(OsString::from).collect();
        args.push(input.as_os_str().to_owned());
        (program, args)
    }

    /// Aligns `input`, writing the alignment (MAFFT's stdout) to `output`.
    ///
    /// `output` is truncated first. A non-zero exit is
    /// [`AlignError::ToolFailed`] with MAFFT's stderr attached.
    pub async fn align(
        &self,
        mode: AlignmentMode,
        input: &Path,
        output: &Path,
    ) -> Result<(), AlignError> {
        let (program, args) = self.command_line(mode, input);
        let program_name = program.to_string_lossy().into_owned();
        let stdout = std::fs::File::create(output)?;

        debug!(program = %program_name, mode = %mode, input = %input.display(), "running aligner");

        let out = tokio::process::Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| AlignError::Spawn {
                program: program_name.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
        if !out.status.success() {
            warn!(program = %program_name, status = ?out.status.code(), "aligner failed");
            return Err(AlignError::ToolFailed {
                program: program_name,
                code: out.status.code(),
                stderr,
            });
        }
        if !stderr.is_empty() {
            debug!(program = %program_name, "aligner stderr: {stderr}");
        }
        Ok(())
    }
}
