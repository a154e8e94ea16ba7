use std::path::Path;

use async_trait::async_trait;

use crate::error::ResolveError;
use crate::models::{MediaDescriptor, StreamFormat};

/// Remote media resolver.
///
/// Split from the orchestrator so tests can script resolutions and downloads
/// without a network.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Resolve an external id into a descriptor with available formats.
    async fn resolve(&self, id: &str) -> Result<MediaDescriptor, ResolveError>;

    /// Stream a format to a local path, returning the bytes written. On error
    /// the file at `dest` may be partial; the caller owns cleanup.
    async fn download(&self, format: &StreamFormat, dest: &Path) -> Result<u64, ResolveError>;
}
