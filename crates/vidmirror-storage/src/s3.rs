//! S3-compatible object store gateway
//!
//! Talks to any S3-compatible endpoint (MinIO in practice) with path-style
//! addressing and static credentials. Every public operation logs its key and
//! duration so a batch run leaves a usable trace.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use vidmirror_core::config::StoreConfig;
use vidmirror_core::sanitize_metadata_value;

use crate::traits::{
    ObjectGateway, ObjectStat, PutResult, StatOutcome, StorageError, StorageResult,
};

const DEFAULT_REGION: &str = "us-east-1";

/// Gateway over an S3-compatible object store.
pub struct S3Gateway {
    client: Client,
    bucket: String,
}

impl S3Gateway {
    /// Build a client from store settings. Does not touch the network; the
    /// first call that does is [`ObjectGateway::ensure_bucket`].
    pub fn new(config: &StoreConfig) -> Self {
        let region = config
            .region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "vidmirror",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(config.endpoint_url())
            .credentials_provider(credentials)
            .region(Region::new(region))
            // MinIO serves buckets under the path, not as subdomains.
            .force_path_style(true)
            .build();

        S3Gateway {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

fn content_type_for(key: &str) -> &'static str {
    match key.rsplit('.').next() {
        Some("json") => "application/json",
        Some("mp4") => "video/mp4",
        Some("mp3") => "audio/mpeg",
        _ => "application/octet-stream",
    }
}

fn to_chrono(dt: &aws_sdk_s3::primitives::DateTime) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

#[async_trait::async_trait]
impl ObjectGateway for S3Gateway {
    async fn ensure_bucket(&self) -> StorageResult<()> {
        let exists = self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok();
        if exists {
            debug!(bucket = %self.bucket, "Bucket exists");
            return Ok(());
        }

        match self
            .client
            .create_bucket()
            .bucket(&self.bucket)
            .send()
            .await
        {
            Ok(_) => {
                info!(bucket = %self.bucket, "Created bucket");
                Ok(())
            }
            Err(err) => {
                // Another client may have created it between head and create.
                let already_there = err
                    .as_service_error()
                    .map(|e| e.is_bucket_already_owned_by_you() || e.is_bucket_already_exists())
                    .unwrap_or(false);
                if already_there {
                    Ok(())
                } else {
                    Err(StorageError::BucketSetup(err.to_string()))
                }
            }
        }
    }

    async fn stat_object(&self, key: &str) -> StorageResult<StatOutcome> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => Ok(StatOutcome::Found(ObjectStat {
                key: key.to_string(),
                size: output.content_length().unwrap_or(0).max(0) as u64,
                etag: output.e_tag().map(str::to_string),
                last_modified: output.last_modified().and_then(to_chrono),
            })),
            Err(err) => {
                let not_found = err
                    .as_service_error()
                    .map(|e| e.is_not_found())
                    .unwrap_or(false);
                if not_found {
                    Ok(StatOutcome::NotFound)
                } else {
                    Err(StorageError::LookupFailed(err.to_string()))
                }
            }
        }
    }

    async fn put_object(
        &self,
        key: &str,
        local_path: &Path,
        metadata: HashMap<String, String>,
    ) -> StorageResult<PutResult> {
        let start = Instant::now();
        let size = tokio::fs::metadata(local_path).await?.len();

        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        let sanitized: HashMap<String, String> = metadata
            .into_iter()
            .map(|(k, v)| (k, sanitize_metadata_value(&v)))
            .collect();

        let output = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type_for(key))
            .set_metadata(Some(sanitized))
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        info!(
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_millis() as u64,
            "Uploaded object"
        );

        Ok(PutResult {
            etag: output.e_tag().map(str::to_string),
            size,
        })
    }

    async fn get_object(&self, key: &str, local_path: &Path) -> StorageResult<u64> {
        let start = Instant::now();

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let not_found = err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false);
                if not_found {
                    StorageError::NotFound(key.to_string())
                } else {
                    StorageError::DownloadFailed(err.to_string())
                }
            })?;

        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(local_path).await?;

        let mut body = output.body;
        let mut written: u64 = 0;
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.sync_all().await?;

        info!(
            key = %key,
            size_bytes = written,
            duration_ms = start.elapsed().as_millis() as u64,
            "Downloaded object"
        );

        Ok(written)
    }

    async fn list_objects(&self, prefix: &str) -> StorageResult<Vec<ObjectStat>> {
        let mut stats = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix);
            if let Some(token) = continuation.take() {
                request = request.continuation_token(token);
            }

            let output = request
                .send()
                .await
                .map_err(|e| StorageError::ListFailed(e.to_string()))?;

            for object in output.contents() {
                let Some(key) = object.key() else { continue };
                stats.push(ObjectStat {
                    key: key.to_string(),
                    size: object.size().unwrap_or(0).max(0) as u64,
                    etag: object.e_tag().map(str::to_string),
                    last_modified: object.last_modified().and_then(to_chrono),
                });
            }

            match output.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        Ok(stats)
    }
}
