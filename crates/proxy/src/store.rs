//! Object-store abstraction used by callers that only need the five
//! transfer operations.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::error::ProxyError;
use crate::proxy::TransferProxy;

/// Boxed future returned by [`RemoteStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ProxyError>> + Send + 'a>>;

/// Remote object storage addressed by `latch:///` locators.
///
/// [`TransferProxy`] is the production implementation; tests substitute an
/// in-memory store.
pub trait RemoteStore: Send + Sync {
    fn exists<'a>(&'a self, remote: &'a str) -> StoreFuture<'a, bool>;

    fn download<'a>(&'a self, remote: &'a str, local_path: &'a Path) -> StoreFuture<'a, bool>;

    fn download_directory<'a>(
        &'a self,
        remote: &'a str,
        local_dir: &'a Path,
    ) -> StoreFuture<'a, bool>;

    fn upload<'a>(&'a self, file_path: &'a Path, remote: &'a str) -> StoreFuture<'a, bool>;

    fn upload_directory<'a>(
        &'a self,
        local_dir: &'a Path,
        remote: &'a str,
    ) -> StoreFuture<'a, bool>;

    /// Prefix for default output locations, if one is configured.
    fn output_prefix_override(&self) -> Option<&str> {
        None
    }
}

impl RemoteStore for TransferProxy {
    fn exists<'a>(&'a self, remote: &'a str) -> StoreFuture<'a, bool> {
        Box::pin(TransferProxy::exists(self, remote))
    }

    fn download<'a>(&'a self, remote: &'a str, local_path: &'a Path) -> StoreFuture<'a, bool> {
        Box::pin(TransferProxy::download(self, remote, local_path))
    }

    fn download_directory<'a>(
        &'a self,
        remote: &'a str,
        local_dir: &'a Path,
    ) -> StoreFuture<'a, bool> {
        Box::pin(TransferProxy::download_directory(self, remote, local_dir))
    }

    fn upload<'a>(&'a self, file_path: &'a Path, remote: &'a str) -> StoreFuture<'a, bool> {
        Box::pin(TransferProxy::upload(self, file_path, remote))
    }

    fn upload_directory<'a>(
        &'a self,
        local_dir: &'a Path,
        remote: &'a str,
    ) -> StoreFuture<'a, bool> {
        Box::pin(TransferProxy::upload_directory(self, local_dir, remote))
    }

    fn output_prefix_override(&self) -> Option<&str> {
        self.raw_output_prefix_override()
    }
}
