//! The transfer proxy: existence checks, downloads and multipart uploads.

use std::path::Path;

use msalign_protocol::{
    BeginUploadRequest, BeginUploadResponse, CompleteUploadRequest, DirectoryUrlsResponse,
    ExistsResponse, ObjectRequest, PresignedUrlResponse, RemoteLocator, Route,
};
use msalign_transfer::{
    ChunkReader, PartPlan, SpeedCalculator, TransferError, UploadSession, guess_content_type,
    scan_directory, validate_relative_path,
};
use tracing::{debug, info};

use crate::client::ControlPlane;
use crate::config::ProxyConfig;
use crate::error::ProxyError;

/// Moves files between local disk and latch object storage.
///
/// Holds only immutable configuration and a pooled HTTP client, so one
/// instance can serve concurrent calls.
pub struct TransferProxy {
    client: ControlPlane,
    chunk_size_bytes: u64,
    execution_id: Option<String>,
    output_prefix_override: Option<String>,
}

impl TransferProxy {
    /// Creates a proxy from a resolved configuration.
    ///
    /// Fails with [`ProxyError::Configuration`] if the endpoint or chunk size
    /// is missing, the endpoint is empty, or the chunk size is zero.
    pub fn new(config: ProxyConfig) -> Result<Self, ProxyError> {
        let endpoint = config
            .endpoint
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| ProxyError::Configuration("latch endpoint must be set".into()))?;
        let chunk_size_bytes = config.chunk_size_bytes.ok_or_else(|| {
            ProxyError::Configuration("upload chunk size must be set".into())
        })?;
        if chunk_size_bytes == 0 {
            return Err(ProxyError::Configuration(
                "upload chunk size must be positive".into(),
            ));
        }

        Ok(Self {
            client: ControlPlane::new(&endpoint)?,
            chunk_size_bytes,
            execution_id: config.execution_id,
            output_prefix_override: config.output_prefix_override,
        })
    }

    /// Base URL of the control plane.
    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    /// Multipart part size in bytes.
    pub fn chunk_size_bytes(&self) -> u64 {
        self.chunk_size_bytes
    }

    /// Execution identifier sent with every request.
    pub fn execution_id(&self) -> Option<&str> {
        self.execution_id.as_deref()
    }

    /// Output prefix override, exactly as configured.
    pub fn raw_output_prefix_override(&self) -> Option<&str> {
        self.output_prefix_override.as_deref()
    }

    fn object_request(&self, locator: &RemoteLocator) -> ObjectRequest {
        ObjectRequest {
            object_url: locator.clone(),
            execution_name: self.execution_id.clone(),
        }
    }

    /// Returns whether an object exists at `remote`.
    pub async fn exists(&self, remote: &str) -> Result<bool, ProxyError> {
        let locator = RemoteLocator::parse(remote)?;

        let resp: ExistsResponse = self
            .client
            .call(Route::ObjectExists, &self.object_request(&locator), || {
                format!("failed to check if object exists at url `{locator}`")
            })
            .await?;

        debug!(locator = %locator, exists = resp.exists, "object existence checked");
        Ok(resp.exists)
    }

    /// Downloads the object at `remote` to `local_path`.
    ///
    /// Overwrites any existing file. Parent directories must exist. Returns
    /// whether `local_path` exists once the transfer finished.
    pub async fn download(&self, remote: &str, local_path: &Path) -> Result<bool, ProxyError> {
        let locator = RemoteLocator::parse(remote)?;

        let presigned: PresignedUrlResponse = self
            .client
            .call(Route::PresignObject, &self.object_request(&locator), || {
                format!("failed to get presigned url for `{locator}`")
            })
            .await?;

        let bytes = self
            .client
            .fetch_to_file(&presigned.url, local_path, || {
                format!("failed to download `{locator}`")
            })
            .await?;

        info!(locator = %locator, path = %local_path.display(), bytes, "downloaded object");
        Ok(tokio::fs::try_exists(local_path).await?)
    }

    /// Mirrors every object under the directory locator `remote` into `local_dir`.
    ///
    /// All presigned URLs come from a single batch call. Each object lands at
    /// `local_dir` joined with its key relative to the directory. Any failed
    /// file aborts the whole operation; files already written are kept.
    /// A key that does not start with the directory key is used whole.
    pub async fn download_directory(
        &self,
        remote: &str,
        local_dir: &Path,
    ) -> Result<bool, ProxyError> {
        let locator = RemoteLocator::parse(remote)?;

        let manifest: DirectoryUrlsResponse = self
            .client
            .call(Route::PresignDirectory, &self.object_request(&locator), || {
                format!("failed to download `{locator}`")
            })
            .await?;

        let dir_key = locator.directory_key();
        debug!(
            locator = %locator,
            dir_key = %dir_key,
            objects = manifest.key_to_url_map.len(),
            "directory presigned"
        );

        let mut total_bytes: u64 = 0;
        for (key, url) in &manifest.key_to_url_map {
            let relative = key.strip_prefix(dir_key.as_str()).unwrap_or(key);

            // Zero-byte "folder" objects only mark a directory.
            if relative.is_empty() || relative.ends_with('/') {
                let dir = relative.trim_end_matches('/');
                if !dir.is_empty() {
                    validate_relative_path(dir)?;
                    tokio::fs::create_dir_all(local_dir.join(dir)).await?;
                }
                debug!(key = %key, "skipping directory placeholder");
                continue;
            }

            validate_relative_path(relative)?;
            let dest = local_dir.join(relative);
            if let Some(parent) = dest.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }

            let bytes = self
                .client
                .fetch_to_file(url, &dest, || format!("failed to download `{key}`"))
                .await?;

            if !tokio::fs::try_exists(&dest).await? {
                return Err(ProxyError::IntegrityCheck(dest));
            }
            debug!(key = %key, path = %dest.display(), bytes, "downloaded object");
            total_bytes += bytes;
        }

        info!(
            locator = %locator,
            path = %local_dir.display(),
            files = manifest.key_to_url_map.len(),
            bytes = total_bytes,
            "downloaded directory"
        );
        Ok(true)
    }

    /// Uploads `file_path` to `remote` with a multipart upload.
    ///
    /// Begin, PUT each part in part-index order, complete. If any part fails
    /// the upload is never completed.
    pub async fn upload(&self, file_path: &Path, remote: &str) -> Result<bool, ProxyError> {
        let locator = RemoteLocator::parse(remote)?;
        self.upload_to(file_path, &locator).await
    }

    async fn upload_to(&self, file_path: &Path, locator: &RemoteLocator) -> Result<bool, ProxyError> {
        // 1. Begin
        let file_size = tokio::fs::metadata(file_path).await?.len();
        let plan = PartPlan::new(file_size, self.chunk_size_bytes);
        let content_type = guess_content_type(file_path);

        let req = BeginUploadRequest {
            object_url: locator.clone(),
            nrof_parts: plan.parts,
            content_type: content_type.to_string(),
            execution_name: self.execution_id.clone(),
        };
        let begin: BeginUploadResponse = self
            .client
            .call(Route::BeginUpload, &req, || {
                format!("failed to get presigned upload urls for `{locator}`")
            })
            .await?;

        let ordered = begin.ordered_urls().map_err(|e| ProxyError::Decode {
            route: Route::BeginUpload,
            message: e.to_string(),
        })?;
        if ordered.len() as u64 != plan.parts {
            return Err(ProxyError::PartCountMismatch {
                expected: plan.parts,
                actual: ordered.len(),
            });
        }

        debug!(
            locator = %locator,
            upload_id = %begin.upload_id,
            parts = plan.parts,
            bytes = file_size,
            content_type,
            "upload started"
        );

        // 2. Parts
        let mut session = UploadSession::new(begin.upload_id, ordered);
        let mut reader = tokio::task::spawn_blocking({
            let path = file_path.to_path_buf();
            let chunk_size = self.chunk_size_bytes;
            move || ChunkReader::new(&path, chunk_size)
        })
        .await??;
        let mut speed = SpeedCalculator::default();

        while let Some(part) = session.next_part().cloned() {
            let (returned, chunk) = tokio::task::spawn_blocking(move || {
                let chunk = reader.next_chunk();
                (reader, chunk)
            })
            .await?;
            reader = returned;

            // An empty file still sends its single part, with no bytes.
            let (read_index, data) = match chunk? {
                Some(chunk) => (chunk.index, chunk.data),
                None => (part.index, Vec::new()),
            };
            if read_index != part.index {
                return Err(TransferError::PartOutOfOrder {
                    expected: part.index,
                    got: read_index,
                }
                .into());
            }
            let len = data.len() as u64;
            plan.check_part(part.index, len)?;

            let etag = self
                .client
                .put_part(part.index, &part.url, data, || {
                    format!(
                        "failed to upload part `{}` of file `{}`",
                        part.index,
                        file_path.display()
                    )
                })
                .await?;

            session.record_part(part.index, etag, len)?;
            speed.add_sample(len);
            debug!(
                locator = %locator,
                part = part.index,
                bytes = len,
                sent = session.bytes_sent(),
                bytes_per_sec = speed.bytes_per_second() as u64,
                "part uploaded"
            );
        }

        // 3. Complete
        let (upload_id, parts) = session.into_completion()?;
        let req = CompleteUploadRequest {
            upload_id,
            parts,
            object_url: locator.clone(),
            execution_name: self.execution_id.clone(),
        };
        self.client
            .post(Route::CompleteUpload, &req, || {
                format!("failed to complete upload for `{locator}`")
            })
            .await?;

        info!(
            locator = %locator,
            path = %file_path.display(),
            parts = plan.parts,
            bytes = file_size,
            "uploaded file"
        );
        Ok(true)
    }

    /// Uploads every regular file under `local_dir` below the directory locator `remote`.
    ///
    /// `latch://` is accepted as the root. Each file gets its own multipart
    /// upload, sequentially, at `remote` + its path relative to `local_dir`.
    pub async fn upload_directory(
        &self,
        local_dir: &Path,
        remote: &str,
    ) -> Result<bool, ProxyError> {
        let locator = RemoteLocator::parse_directory(remote)?.with_trailing_slash();

        let files = tokio::task::spawn_blocking({
            let root = local_dir.to_path_buf();
            move || scan_directory(&root)
        })
        .await??;

        debug!(
            locator = %locator,
            path = %local_dir.display(),
            files = files.len(),
            "directory scanned"
        );

        for file in &files {
            let target = locator.join(&file.relative_path);
            self.upload_to(&file.path, &target).await?;
        }

        info!(
            locator = %locator,
            path = %local_dir.display(),
            files = files.len(),
            bytes = files.iter().map(|f| f.size).sum::<u64>(),
            "uploaded directory"
        );
        Ok(true)
    }
}
