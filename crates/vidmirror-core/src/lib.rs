//! Vidmirror Core Library
//!
//! Shared types for the mirrored-download workflow: the typed records
//! (MediaItem, MetadataRecord, PlaylistRecord), the configuration loaded once
//! at startup, and metadata-value sanitization.
//!
//! # Artifact pairs
//!
//! Every mirrored video is stored as a pair of objects sharing a base name:
//! the payload (`{id}.mp4` or `{id}.mp3`) and a JSON sidecar (`{id}.json`)
//! holding the [`MetadataRecord`]. Existence of **both** objects is the sole
//! truth of "already mirrored"; a partial pair is treated as absent.

pub mod config;
pub mod models;
pub mod sanitize;

pub use config::{Config, StoreConfig};
pub use models::{MediaItem, MetadataRecord, PlaylistRecord, SourceType};
pub use sanitize::{sanitize_metadata_value, MAX_METADATA_VALUE_LEN};
