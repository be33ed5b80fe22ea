//! Transfer proxy between local disk and latch object storage.
//!
//! The proxy talks to the latch control plane to check object existence and
//! obtain presigned URLs, then moves bytes directly against object storage:
//!
//! - **exists**: one call to the existence route
//! - **download**: presign one object, stream it to disk
//! - **download_directory**: presign a whole prefix in one call, mirror it locally
//! - **upload**: begin a multipart upload, PUT every part, complete it
//! - **upload_directory**: walk a local tree and upload each file
//!
//! Every remote call is single-attempt; any failure aborts the operation.

mod client;
pub mod config;
pub mod error;
pub mod proxy;
pub mod store;

#[cfg(test)]
mod mock_remote;

// Re-export primary types for convenience.
pub use config::ProxyConfig;
pub use error::ProxyError;
pub use proxy::TransferProxy;
pub use store::{RemoteStore, StoreFuture};
