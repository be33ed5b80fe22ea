use std::fmt;

/// Prefix every object locator must start with (empty authority).
pub const LOCATOR_PREFIX: &str = "latch:///";

/// The bare root as callers sometimes spell it.
pub const BARE_ROOT: &str = "latch://";

/// Control-plane endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://nucleus.latch.bio";

/// Multipart part size used when nothing else is configured (10 MB).
pub const DEFAULT_CHUNK_SIZE_BYTES: u64 = 10_000_000;

/// Content type sent when none can be inferred from the file name.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Response header carrying the integrity tag of an uploaded part.
pub const ETAG_HEADER: &str = "ETag";

/// Control-plane routes consumed by the transfer proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Checks whether an object exists at a locator.
    ObjectExists,
    /// Presigns every object under a directory locator in one call.
    PresignDirectory,
    /// Presigns a single object for retrieval.
    PresignObject,
    /// Starts a multipart upload and presigns its parts.
    BeginUpload,
    /// Finalizes a multipart upload.
    CompleteUpload,
}

impl Route {
    /// All routes, in protocol order.
    pub const ALL: [Route; 5] = [
        Route::ObjectExists,
        Route::PresignDirectory,
        Route::PresignObject,
        Route::BeginUpload,
        Route::CompleteUpload,
    ];

    /// Path appended to the endpoint base URL.
    pub fn path(self) -> &'static str {
        match self {
            Route::ObjectExists => "/api/object-exists-at-url",
            Route::PresignDirectory => "/api/get-presigned-urls-for-dir",
            Route::PresignObject => "/api/get-presigned-url",
            Route::BeginUpload => "/api/begin-upload",
            Route::CompleteUpload => "/api/complete-upload",
        }
    }

    /// Resolves the route against an endpoint base URL.
    pub fn url(self, endpoint: &str) -> String {
        format!("{}{}", endpoint.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Route::ObjectExists => "object-exists",
            Route::PresignDirectory => "presign-directory",
            Route::PresignObject => "presign-object",
            Route::BeginUpload => "begin-upload",
            Route::CompleteUpload => "complete-upload",
        };
        f.write_str(name)
    }
}
