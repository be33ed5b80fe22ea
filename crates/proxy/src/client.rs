//! HTTP plumbing shared by the proxy operations.
//!
//! Two kinds of traffic: JSON POSTs to control-plane routes, and raw byte
//! GET/PUT against presigned object-storage URLs.

use std::path::Path;

use msalign_protocol::Route;
use msalign_protocol::constants::ETAG_HEADER;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;

use crate::error::ProxyError;

/// Control-plane client bound to one endpoint.
pub(crate) struct ControlPlane {
    http: reqwest::Client,
    endpoint: String,
}

impl ControlPlane {
    /// Creates a client for `endpoint` (trailing `/` trimmed).
    pub(crate) fn new(endpoint: &str) -> Result<Self, ProxyError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POSTs `body` to `route` and decodes the JSON response.
    ///
    /// A non-success status becomes [`ProxyError::Remote`] with the message
    /// produced by `context`.
    pub(crate) async fn call<T, R>(
        &self,
        route: Route,
        body: &T,
        context: impl FnOnce() -> String,
    ) -> Result<R, ProxyError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self.post(route, body, context).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ProxyError::Decode {
            route,
            message: e.to_string(),
        })
    }

    /// POSTs `body` to `route`, checking only the status.
    pub(crate) async fn post<T>(
        &self,
        route: Route,
        body: &T,
        context: impl FnOnce() -> String,
    ) -> Result<reqwest::Response, ProxyError>
    where
        T: Serialize + ?Sized,
    {
        let url = route.url(&self.endpoint);
        let resp = self.http.post(&url).json(body).send().await?;
        check_status(resp, context)
    }

    /// PUTs one part to its presigned URL and returns the store's ETag.
    pub(crate) async fn put_part(
        &self,
        part: u32,
        url: &str,
        data: Vec<u8>,
        context: impl FnOnce() -> String,
    ) -> Result<String, ProxyError> {
        let resp = self.http.put(url).body(data).send().await?;
        let resp = check_status(resp, context)?;
        resp.headers()
            .get(ETAG_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .ok_or(ProxyError::MissingEtag { part })
    }

    /// Streams a presigned GET to `dest`, truncating any existing file.
    ///
    /// Returns the number of bytes written.
    pub(crate) async fn fetch_to_file(
        &self,
        url: &str,
        dest: &Path,
        context: impl FnOnce() -> String,
    ) -> Result<u64, ProxyError> {
        let resp = self.http.get(url).send().await?;
        let mut resp = check_status(resp, context)?;

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }
}

fn check_status(
    resp: reqwest::Response,
    context: impl FnOnce() -> String,
) -> Result<reqwest::Response, ProxyError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ProxyError::Remote {
            message: context(),
            status: status.as_u16(),
        });
    }
    Ok(resp)
}
