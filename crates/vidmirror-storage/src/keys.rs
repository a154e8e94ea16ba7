//! Shared key generation for artifact pairs.
//!
//! Key format: `{prefix}/{id}.{ext}` for the payload, `{prefix}/{id}.json`
//! for the metadata sidecar. The external id is the deterministic key root
//! for every derived local and remote name.

/// Payload extension for a download request: `mp3` for audio-only, else `mp4`.
pub fn payload_extension(audio_only: bool) -> &'static str {
    if audio_only {
        "mp3"
    } else {
        "mp4"
    }
}

/// The remote key pair of one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactKeys {
    pub payload: String,
    pub metadata: String,
}

impl ArtifactKeys {
    /// Build the deterministic key pair for an id under a prefix.
    pub fn new(prefix: &str, id: &str, ext: &str) -> Self {
        let prefix = prefix.trim_matches('/');
        ArtifactKeys {
            payload: format!("{}/{}.{}", prefix, id, ext),
            metadata: format!("{}/{}.json", prefix, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_keys_share_base_name() {
        let keys = ArtifactKeys::new("downloads", "dQw4w9WgXcQ", "mp4");
        assert_eq!(keys.payload, "downloads/dQw4w9WgXcQ.mp4");
        assert_eq!(keys.metadata, "downloads/dQw4w9WgXcQ.json");
    }

    #[test]
    fn test_prefix_slashes_normalized() {
        let keys = ArtifactKeys::new("/downloads/", "abc", "mp3");
        assert_eq!(keys.payload, "downloads/abc.mp3");
        assert_eq!(keys.metadata, "downloads/abc.json");
    }

    #[test]
    fn test_payload_extension() {
        assert_eq!(payload_extension(false), "mp4");
        assert_eq!(payload_extension(true), "mp3");
    }
}
