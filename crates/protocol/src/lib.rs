//! Wire protocol for the latch object-storage control plane.
//!
//! Holds the `latch:///` locator type, the route table and the JSON
//! request/response records exchanged with the endpoint.

pub mod constants;
pub mod locator;
pub mod messages;

// Re-export primary types for convenience.
pub use constants::Route;
pub use locator::{LocatorError, RemoteLocator};
pub use messages::{
    BeginUploadRequest, BeginUploadResponse, CompleteUploadRequest, CompletedPart,
    DirectoryUrlsResponse, ExistsResponse, ObjectRequest, PresignedUrlResponse,
};
