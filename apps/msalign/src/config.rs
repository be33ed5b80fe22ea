//! CLI configuration.
//!
//! Reads TOML at `~/.config/msalign/latch.toml`, then applies environment
//! overrides, then command-line flags. Only this module looks at the
//! environment; the library crates take everything as constructor input.

use std::path::{Path, PathBuf};

use anyhow::Context;
use msalign_protocol::constants::{DEFAULT_CHUNK_SIZE_BYTES, DEFAULT_ENDPOINT};
use msalign_proxy::ProxyConfig;
use serde::Deserialize;

pub const ENV_ENDPOINT: &str = "LATCH_AUTHENTICATION_ENDPOINT";
pub const ENV_CHUNK_SIZE: &str = "LATCH_UPLOAD_CHUNK_SIZE_BYTES";
pub const ENV_EXECUTION_ID: &str = "FLYTE_INTERNAL_EXECUTION_ID";

/// On-disk config format.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    latch: LatchSection,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LatchSection {
    authentication_endpoint: String,
    upload_chunk_size_bytes: u64,
    output_prefix_override: Option<String>,
}

impl Default for LatchSection {
    fn default() -> Self {
        Self {
            authentication_endpoint: DEFAULT_ENDPOINT.into(),
            upload_chunk_size_bytes: DEFAULT_CHUNK_SIZE_BYTES,
            output_prefix_override: None,
        }
    }
}

/// Resolved settings for one CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub chunk_size_bytes: u64,
    pub execution_id: Option<String>,
    pub output_prefix_override: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(LatchSection::default())
    }
}

impl From<LatchSection> for Settings {
    fn from(section: LatchSection) -> Self {
        Self {
            endpoint: section.authentication_endpoint,
            chunk_size_bytes: section.upload_chunk_size_bytes,
            execution_id: None,
            output_prefix_override: section.output_prefix_override,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or from the default location.
    ///
    /// A missing file yields defaults; an unreadable or malformed one is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
            return Ok(Self::default());
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let settings = Self::from_toml(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(Self::from(file.latch))
    }

    /// Applies environment overrides, read through `lookup`.
    ///
    /// Empty values count as unset.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = get(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(raw) = get(ENV_CHUNK_SIZE) {
            self.chunk_size_bytes = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_CHUNK_SIZE} is not a byte count: {raw}"))?;
        }
        if let Some(id) = get(ENV_EXECUTION_ID) {
            self.execution_id = Some(id);
        }
        Ok(())
    }

    /// Applies command-line flags, which beat every other source.
    pub fn apply_flags(&mut self, endpoint: Option<String>, chunk_size_bytes: Option<u64>) {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        if let Some(chunk) = chunk_size_bytes {
            self.chunk_size_bytes = chunk;
        }
    }

    pub fn proxy_config(&self) -> ProxyConfig {
        ProxyConfig {
            endpoint: Some(self.endpoint.clone()),
            chunk_size_bytes: Some(self.chunk_size_bytes),
            execution_id: self.execution_id.clone(),
            output_prefix_override: self.output_prefix_override.clone(),
        }
    }
}

/// `~/.config/msalign/latch.toml`, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    #[cfg(windows)]
    let base = std::env::var_os("APPDATA").map(PathBuf::from);
    #[cfg(not(windows))]
    let base = std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"));

    base.map(|dir| dir.join("msalign").join("latch.toml"))
}
