//! Mirrored-download orchestrator
//!
//! Drives one id through the mirror state machine: check the remote store,
//! skip if the artifact pair already exists, otherwise fetch to staging and
//! persist both objects. Idempotence comes entirely from remote store
//! content; the orchestrator keeps no memory between calls.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use vidmirror_core::models::{MediaItem, MetadataRecord};
use vidmirror_resolver::{choose_format, MediaResolver, Quality};
use vidmirror_storage::{payload_extension, ArtifactKeys, ObjectGateway};

use crate::error::MirrorError;

/// Per-request download options.
#[derive(Debug, Clone, Copy)]
pub struct MirrorOptions {
    pub quality: Quality,
    pub audio_only: bool,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        MirrorOptions {
            quality: Quality::Best,
            audio_only: false,
        }
    }
}

/// The remote keys of a mirrored artifact pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirroredPair {
    pub payload_key: String,
    pub metadata_key: String,
}

/// Terminal state of one mirror attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// Both objects already existed; nothing was fetched.
    Skipped(MirroredPair),
    /// The pair was fetched and persisted in this run.
    Downloaded(MirroredPair),
}

/// Orchestrates single mirror attempts over injected gateway and resolver.
pub struct MirrorOrchestrator {
    gateway: Arc<dyn ObjectGateway>,
    resolver: Arc<dyn MediaResolver>,
    staging_dir: PathBuf,
    key_prefix: String,
}

impl MirrorOrchestrator {
    pub fn new(
        gateway: Arc<dyn ObjectGateway>,
        resolver: Arc<dyn MediaResolver>,
        staging_dir: PathBuf,
        key_prefix: String,
    ) -> Self {
        MirrorOrchestrator {
            gateway,
            resolver,
            staging_dir,
            key_prefix,
        }
    }

    /// Mirror one id, exactly once: skip when the pair is already stored,
    /// otherwise download and persist payload plus metadata sidecar.
    pub async fn mirror(
        &self,
        id: &str,
        options: &MirrorOptions,
    ) -> Result<MirrorOutcome, MirrorError> {
        let start = Instant::now();
        let ext = payload_extension(options.audio_only);
        let keys = ArtifactKeys::new(&self.key_prefix, id, ext);
        let pair = MirroredPair {
            payload_key: keys.payload.clone(),
            metadata_key: keys.metadata.clone(),
        };

        if self.pair_exists(id, &keys).await {
            info!(id = %id, key = %keys.payload, "Already mirrored, skipping");
            return Ok(MirrorOutcome::Skipped(pair));
        }

        let descriptor = self
            .resolver
            .resolve(id)
            .await
            .map_err(|source| MirrorError::Resolution {
                id: id.to_string(),
                source,
            })?;
        let format = choose_format(&descriptor, options.quality, options.audio_only).map_err(
            |source| MirrorError::Resolution {
                id: id.to_string(),
                source,
            },
        )?;

        let item = MediaItem {
            id: id.to_string(),
            title: descriptor.title.clone(),
            author: descriptor.author.clone(),
            duration_seconds: descriptor.duration_seconds,
            selected_format_label: format.label(),
        };

        let payload_path = self.staging_dir.join(format!("{}.{}", id, ext));
        let metadata_path = self.staging_dir.join(format!("{}.json", id));

        if let Err(source) = self.resolver.download(format, &payload_path).await {
            // Do not leave a partial payload behind for the next run to trip on.
            let _ = tokio::fs::remove_file(&payload_path).await;
            return Err(MirrorError::Fetch {
                id: id.to_string(),
                source,
            });
        }

        let filename = format!("{}.{}", id, ext);
        let record = MetadataRecord::new(
            &item,
            watch_url(id),
            descriptor.description.clone(),
            descriptor.view_count,
            descriptor.publish_date.clone(),
            filename,
        );
        let json = serde_json::to_vec_pretty(&record).map_err(|e| MirrorError::Staging {
            id: id.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        tokio::fs::write(&metadata_path, &json)
            .await
            .map_err(|source| MirrorError::Staging {
                id: id.to_string(),
                source,
            })?;

        let object_metadata = record.object_metadata();
        for key in [&keys.payload, &keys.metadata] {
            let local = if key == &keys.payload {
                &payload_path
            } else {
                &metadata_path
            };
            if let Err(source) = self
                .gateway
                .put_object(key, local, object_metadata.clone())
                .await
            {
                // Keep staging files so the operator can inspect or retry.
                return Err(MirrorError::Upload {
                    id: id.to_string(),
                    key: key.clone(),
                    payload_path,
                    metadata_path,
                    source,
                });
            }
        }

        for path in [&payload_path, &metadata_path] {
            if let Err(err) = tokio::fs::remove_file(path).await {
                warn!(path = %path.display(), error = %err, "Failed to clean staging file");
            }
        }

        info!(
            id = %id,
            key = %keys.payload,
            format = %item.selected_format_label,
            duration_ms = start.elapsed().as_millis() as u64,
            "Mirrored video"
        );

        Ok(MirrorOutcome::Downloaded(pair))
    }

    /// True only when BOTH objects of the pair are present. A partial pair or
    /// an indeterminate lookup counts as absent, so the pair gets re-created
    /// whole.
    async fn pair_exists(&self, id: &str, keys: &ArtifactKeys) -> bool {
        let payload = match self.gateway.stat_object(&keys.payload).await {
            Ok(outcome) => outcome.is_found(),
            Err(err) => {
                warn!(id = %id, key = %keys.payload, error = %err, "Lookup failed, treating as absent");
                return false;
            }
        };
        let metadata = match self.gateway.stat_object(&keys.metadata).await {
            Ok(outcome) => outcome.is_found(),
            Err(err) => {
                warn!(id = %id, key = %keys.metadata, error = %err, "Lookup failed, treating as absent");
                return false;
            }
        };

        if payload != metadata {
            warn!(id = %id, "Partial artifact pair in store, re-mirroring both objects");
            return false;
        }
        payload && metadata
    }
}

fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::doubles::{MemoryGateway, ScriptedResolver};

    fn orchestrator(
        gateway: Arc<MemoryGateway>,
        resolver: Arc<ScriptedResolver>,
        staging: &std::path::Path,
    ) -> MirrorOrchestrator {
        MirrorOrchestrator::new(
            gateway,
            resolver,
            staging.to_path_buf(),
            "downloads".to_string(),
        )
    }

    #[tokio::test]
    async fn test_skips_when_pair_exists() {
        let staging = tempfile::tempdir().unwrap();
        let gateway = Arc::new(MemoryGateway::new());
        gateway.insert("downloads/abcdefghijk.mp4", b"payload");
        gateway.insert("downloads/abcdefghijk.json", b"{}");
        let resolver = Arc::new(ScriptedResolver::new("abcdefghijk"));

        let orch = orchestrator(gateway.clone(), resolver.clone(), staging.path());
        let outcome = orch
            .mirror("abcdefghijk", &MirrorOptions::default())
            .await
            .unwrap();

        assert!(matches!(outcome, MirrorOutcome::Skipped(_)));
        assert_eq!(gateway.stat_calls(), 2);
        assert_eq!(resolver.resolve_calls(), 0);
    }

    #[tokio::test]
    async fn test_partial_pair_triggers_full_mirror() {
        let staging = tempfile::tempdir().unwrap();
        let gateway = Arc::new(MemoryGateway::new());
        gateway.insert("downloads/abcdefghijk.mp4", b"payload");
        let resolver = Arc::new(ScriptedResolver::new("abcdefghijk"));

        let orch = orchestrator(gateway.clone(), resolver.clone(), staging.path());
        let outcome = orch
            .mirror("abcdefghijk", &MirrorOptions::default())
            .await
            .unwrap();

        assert!(matches!(outcome, MirrorOutcome::Downloaded(_)));
        assert_eq!(resolver.resolve_calls(), 1);
        assert!(gateway.contains("downloads/abcdefghijk.json"));
    }

    #[tokio::test]
    async fn test_download_persists_pair_and_cleans_staging() {
        let staging = tempfile::tempdir().unwrap();
        let gateway = Arc::new(MemoryGateway::new());
        let resolver = Arc::new(ScriptedResolver::new("abcdefghijk"));

        let orch = orchestrator(gateway.clone(), resolver.clone(), staging.path());
        let outcome = orch
            .mirror("abcdefghijk", &MirrorOptions::default())
            .await
            .unwrap();

        let MirrorOutcome::Downloaded(pair) = outcome else {
            panic!("expected Downloaded");
        };
        assert_eq!(pair.payload_key, "downloads/abcdefghijk.mp4");
        assert_eq!(pair.metadata_key, "downloads/abcdefghijk.json");
        assert!(gateway.contains(&pair.payload_key));
        assert!(gateway.contains(&pair.metadata_key));

        // Staging directory is left empty after a successful mirror.
        let mut entries = tokio::fs::read_dir(staging.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_audio_only_uses_mp3_keys() {
        let staging = tempfile::tempdir().unwrap();
        let gateway = Arc::new(MemoryGateway::new());
        let resolver = Arc::new(ScriptedResolver::new("abcdefghijk"));

        let orch = orchestrator(gateway.clone(), resolver.clone(), staging.path());
        let options = MirrorOptions {
            quality: Quality::Best,
            audio_only: true,
        };
        let outcome = orch.mirror("abcdefghijk", &options).await.unwrap();

        let MirrorOutcome::Downloaded(pair) = outcome else {
            panic!("expected Downloaded");
        };
        assert_eq!(pair.payload_key, "downloads/abcdefghijk.mp3");
    }

    #[tokio::test]
    async fn test_upload_failure_keeps_staging_files() {
        let staging = tempfile::tempdir().unwrap();
        let gateway = Arc::new(MemoryGateway::new());
        gateway.fail_next_put();
        let resolver = Arc::new(ScriptedResolver::new("abcdefghijk"));

        let orch = orchestrator(gateway.clone(), resolver.clone(), staging.path());
        let err = orch
            .mirror("abcdefghijk", &MirrorOptions::default())
            .await
            .unwrap_err();

        let MirrorError::Upload {
            payload_path,
            metadata_path,
            ..
        } = err
        else {
            panic!("expected Upload error");
        };
        assert!(payload_path.exists());
        assert!(metadata_path.exists());
        assert!(std::fs::metadata(&payload_path).unwrap().len() > 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_removes_partial_file() {
        let staging = tempfile::tempdir().unwrap();
        let gateway = Arc::new(MemoryGateway::new());
        let resolver = Arc::new(ScriptedResolver::new("abcdefghijk"));
        resolver.fail_download_after_partial_write();

        let orch = orchestrator(gateway.clone(), resolver.clone(), staging.path());
        let err = orch
            .mirror("abcdefghijk", &MirrorOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, MirrorError::Fetch { .. }));
        assert!(!staging.path().join("abcdefghijk.mp4").exists());
        assert!(!gateway.contains("downloads/abcdefghijk.mp4"));
    }

    #[tokio::test]
    async fn test_lookup_error_falls_back_to_download() {
        let staging = tempfile::tempdir().unwrap();
        let gateway = Arc::new(MemoryGateway::new());
        gateway.fail_next_stat();
        let resolver = Arc::new(ScriptedResolver::new("abcdefghijk"));

        let orch = orchestrator(gateway.clone(), resolver.clone(), staging.path());
        let outcome = orch
            .mirror("abcdefghijk", &MirrorOptions::default())
            .await
            .unwrap();

        assert!(matches!(outcome, MirrorOutcome::Downloaded(_)));
        assert_eq!(resolver.resolve_calls(), 1);
    }
}
