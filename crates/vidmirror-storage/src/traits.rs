//! Object store gateway abstraction
//!
//! This module defines the `ObjectGateway` trait the orchestrator and batch
//! driver depend on. The trait exists so tests can substitute an in-memory
//! double for the real S3 client.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Bucket setup failed: {0}")]
    BucketSetup(String),

    #[error("Lookup failed: {0}")]
    LookupFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Metadata of a stored object.
#[derive(Debug, Clone)]
pub struct ObjectStat {
    pub key: String,
    pub size: u64,
    pub etag: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Outcome of a metadata lookup.
///
/// NotFound is a normal, expected outcome of the pre-download check, not an
/// error to log. Genuine transport failures come back as `StorageError`
/// instead, so callers never have to inspect error strings.
#[derive(Debug, Clone)]
pub enum StatOutcome {
    Found(ObjectStat),
    NotFound,
}

impl StatOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, StatOutcome::Found(_))
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct PutResult {
    pub etag: Option<String>,
    pub size: u64,
}

/// Object store gateway.
///
/// Stateless between calls: all idempotence in the mirrored-download workflow
/// comes from the remote store's content, never from gateway-local memory.
#[async_trait]
pub trait ObjectGateway: Send + Sync {
    /// Create the configured bucket if absent. Idempotent; fails only on
    /// transport or auth errors.
    async fn ensure_bucket(&self) -> StorageResult<()>;

    /// Look up object metadata. Returns `StatOutcome::NotFound` for a missing
    /// key; `Err` only for failures distinguishable from NotFound.
    async fn stat_object(&self, key: &str) -> StorageResult<StatOutcome>;

    /// Upload a local file. Metadata values are sanitized before being sent
    /// since the transport constrains header values.
    async fn put_object(
        &self,
        key: &str,
        local_path: &Path,
        metadata: HashMap<String, String>,
    ) -> StorageResult<PutResult>;

    /// Stream a remote object to a local path, creating parent directories as
    /// needed. Returns the number of bytes written.
    async fn get_object(&self, key: &str, local_path: &Path) -> StorageResult<u64>;

    /// List objects under a prefix. Diagnostics only, not on the hot path.
    async fn list_objects(&self, prefix: &str) -> StorageResult<Vec<ObjectStat>>;
}
