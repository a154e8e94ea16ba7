//! Vidmirror Resolver Library
//!
//! Resolves an external video id into a media descriptor (title, author,
//! duration, available stream formats) and streams a chosen format to disk.
//! The [`MediaResolver`] trait is the seam the orchestrator depends on, so
//! tests never reach the network.

pub mod error;
pub mod format;
pub mod models;
pub mod traits;
pub mod youtube;

pub use error::ResolveError;
pub use format::choose_format;
pub use models::{MediaDescriptor, Quality, StreamFormat};
pub use traits::MediaResolver;
pub use youtube::YoutubeResolver;
