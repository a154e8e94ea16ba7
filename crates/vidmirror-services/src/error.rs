use std::path::PathBuf;

use thiserror::Error;

use vidmirror_resolver::ResolveError;
use vidmirror_storage::StorageError;

/// One mirror attempt's failure, tagged with the phase it failed in.
///
/// The `Upload` variant keeps the staging paths so an operator can inspect or
/// retry without re-downloading; every other failure leaves no staging files
/// behind.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Failed to resolve {id}: {source}")]
    Resolution {
        id: String,
        #[source]
        source: ResolveError,
    },

    #[error("Failed to fetch {id}: {source}")]
    Fetch {
        id: String,
        #[source]
        source: ResolveError,
    },

    #[error("Failed to upload {key} for {id}: {source}")]
    Upload {
        id: String,
        key: String,
        payload_path: PathBuf,
        metadata_path: PathBuf,
        #[source]
        source: StorageError,
    },

    #[error("Staging failure for {id}: {source}")]
    Staging {
        id: String,
        #[source]
        source: std::io::Error,
    },
}
