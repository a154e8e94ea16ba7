//! Vidmirror Storage Library
//!
//! Object store gateway for mirrored artifacts. The [`ObjectGateway`] trait
//! is the narrow surface the orchestrator depends on; [`S3Gateway`] talks to
//! any S3-compatible store (MinIO in practice).
//!
//! # Object key format
//!
//! Artifact pairs live under a shared prefix: `{prefix}/{id}.{ext}` for the
//! payload and `{prefix}/{id}.json` for the metadata sidecar. Key generation
//! is centralized in the `keys` module so every caller stays consistent.

pub mod keys;
pub mod s3;
pub mod traits;

pub use keys::{payload_extension, ArtifactKeys};
pub use s3::S3Gateway;
pub use traits::{
    ObjectGateway, ObjectStat, PutResult, StatOutcome, StorageError, StorageResult,
};
