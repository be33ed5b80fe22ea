use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::locator::RemoteLocator;

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Body of the existence-check and presign routes.
///
/// `execution_name` is sent as `null` outside of a pipeline execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRequest {
    pub object_url: RemoteLocator,
    pub execution_name: Option<String>,
}

/// Starts a multipart upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeginUploadRequest {
    pub object_url: RemoteLocator,
    pub nrof_parts: u64,
    pub content_type: String,
    pub execution_name: Option<String>,
}

/// One uploaded part, as the store reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedPart {
    #[serde(rename = "ETag")]
    pub etag: String,
    /// 1-based part number.
    #[serde(rename = "PartNumber")]
    pub part_number: u32,
}

/// Finalizes a multipart upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteUploadRequest {
    pub upload_id: String,
    pub parts: Vec<CompletedPart>,
    pub object_url: RemoteLocator,
    pub execution_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Response of the existence-check route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

/// Response of the single-object presign route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresignedUrlResponse {
    pub url: String,
}

/// Response of the directory presign route: object key to presigned GET URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryUrlsResponse {
    pub key_to_url_map: BTreeMap<String, String>,
}

/// Response of the begin-upload route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeginUploadResponse {
    pub upload_id: String,
    /// Part index (decimal string, 0-based) to presigned PUT URL.
    pub urls: HashMap<String, String>,
}

/// A begin-upload part map that is not a usable part sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartIndexError {
    #[error("invalid part index `{0}`")]
    NotAnIndex(String),

    #[error("part index {got} out of sequence (expected {expected})")]
    OutOfSequence { expected: u32, got: u32 },
}

impl BeginUploadResponse {
    /// Returns the presigned part URLs sorted by numeric part index.
    ///
    /// JSON object order is not trusted: `"10"` sorts after `"9"`. The
    /// indices must be exactly `0..n`, so duplicates (`"0"` and `"00"`) and
    /// gaps are rejected and every index has a 1-based part number.
    pub fn ordered_urls(&self) -> Result<Vec<(u32, String)>, PartIndexError> {
        let mut parts = self
            .urls
            .iter()
            .map(|(key, url)| {
                key.parse::<u32>()
                    .map(|index| (index, url.clone()))
                    .map_err(|_| PartIndexError::NotAnIndex(key.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        parts.sort_by_key(|(index, _)| *index);

        for (expected, (got, _)) in (0u32..).zip(&parts) {
            if *got != expected {
                return Err(PartIndexError::OutOfSequence {
                    expected,
                    got: *got,
                });
            }
        }
        Ok(parts)
    }
}
