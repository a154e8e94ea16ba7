//! YouTube resolver
//!
//! Uses the public innertube player endpoint with an Android client context,
//! which returns direct stream URLs for most videos. Formats protected by a
//! signature cipher carry no direct URL and are skipped.

use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::ResolveError;
use crate::models::{MediaDescriptor, StreamFormat};
use crate::traits::MediaResolver;

const PLAYER_ENDPOINT: &str = "https://www.youtube.com/youtubei/v1/player";
const CLIENT_NAME: &str = "ANDROID";
const CLIENT_VERSION: &str = "19.09.37";

/// Resolver backed by the YouTube innertube API.
pub struct YoutubeResolver {
    http: reqwest::Client,
}

impl YoutubeResolver {
    pub fn new() -> Self {
        YoutubeResolver {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for YoutubeResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_id(id: &str) -> Result<(), ResolveError> {
    let valid = id.len() == 11
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ResolveError::InvalidId(id.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    video_details: Option<VideoDetails>,
    streaming_data: Option<StreamingData>,
    microformat: Option<Microformat>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoDetails {
    title: String,
    author: String,
    #[serde(default)]
    length_seconds: String,
    #[serde(default)]
    short_description: String,
    #[serde(default)]
    view_count: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamingData {
    #[serde(default)]
    formats: Vec<RawFormat>,
    #[serde(default)]
    adaptive_formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFormat {
    itag: i64,
    url: Option<String>,
    mime_type: String,
    quality_label: Option<String>,
    #[serde(default)]
    bitrate: u64,
    content_length: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Microformat {
    player_microformat_renderer: Option<MicroformatRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MicroformatRenderer {
    publish_date: Option<String>,
}

fn convert_format(raw: RawFormat, adaptive: bool) -> Option<StreamFormat> {
    // No direct URL means the stream is cipher-protected.
    let url = raw.url?;
    let (has_video, has_audio) = if adaptive {
        let is_video = raw.mime_type.starts_with("video/");
        (is_video, !is_video)
    } else {
        (true, true)
    };
    Some(StreamFormat {
        itag: raw.itag,
        url,
        mime_type: raw.mime_type,
        quality_label: raw.quality_label,
        bitrate: raw.bitrate,
        content_length: raw.content_length.and_then(|s| s.parse().ok()),
        has_video,
        has_audio,
    })
}

#[async_trait]
impl MediaResolver for YoutubeResolver {
    async fn resolve(&self, id: &str) -> Result<MediaDescriptor, ResolveError> {
        validate_id(id)?;
        let start = Instant::now();

        let body = json!({
            "videoId": id,
            "context": {
                "client": {
                    "clientName": CLIENT_NAME,
                    "clientVersion": CLIENT_VERSION,
                    "androidSdkVersion": 34,
                }
            }
        });

        let response: PlayerResponse = self
            .http
            .post(PLAYER_ENDPOINT)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(status) = &response.playability_status {
            if status.status != "OK" {
                return Err(ResolveError::Unavailable {
                    id: id.to_string(),
                    reason: status
                        .reason
                        .clone()
                        .unwrap_or_else(|| status.status.clone()),
                });
            }
        }

        let details = response
            .video_details
            .ok_or_else(|| ResolveError::Parse("missing videoDetails".to_string()))?;
        let streaming = response
            .streaming_data
            .ok_or_else(|| ResolveError::Parse("missing streamingData".to_string()))?;

        let mut formats: Vec<StreamFormat> = streaming
            .formats
            .into_iter()
            .filter_map(|f| convert_format(f, false))
            .chain(
                streaming
                    .adaptive_formats
                    .into_iter()
                    .filter_map(|f| convert_format(f, true)),
            )
            .collect();
        // Combined streams first, tallest first, so logs read naturally.
        formats.sort_by(|a, b| {
            b.is_combined()
                .cmp(&a.is_combined())
                .then(b.height().cmp(&a.height()))
                .then(b.bitrate.cmp(&a.bitrate))
        });

        if formats.is_empty() {
            warn!(id = %id, "All stream formats are cipher-protected");
        }

        let publish_date = response
            .microformat
            .and_then(|m| m.player_microformat_renderer)
            .and_then(|r| r.publish_date)
            .unwrap_or_default();

        let descriptor = MediaDescriptor {
            id: id.to_string(),
            title: details.title,
            author: details.author,
            duration_seconds: details.length_seconds.parse().unwrap_or(0),
            description: details.short_description,
            view_count: details.view_count.parse().unwrap_or(0),
            publish_date,
            formats,
        };

        info!(
            id = %id,
            title = %descriptor.title,
            formats = descriptor.formats.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Resolved video"
        );

        Ok(descriptor)
    }

    async fn download(&self, format: &StreamFormat, dest: &Path) -> Result<u64, ResolveError> {
        let start = Instant::now();

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(dest).await?;

        let mut response = self
            .http
            .get(&format.url)
            .send()
            .await?
            .error_for_status()?;

        let total = format
            .content_length
            .or_else(|| response.content_length());
        let mut written: u64 = 0;
        let mut next_report_pct: u64 = 10;

        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            if let Some(total) = total {
                if total > 0 {
                    let pct = written * 100 / total;
                    if pct >= next_report_pct {
                        debug!(itag = format.itag, pct = pct, "Download progress");
                        next_report_pct = (pct / 10 + 1) * 10;
                    }
                }
            }
        }
        file.sync_all().await?;

        info!(
            itag = format.itag,
            size_bytes = written,
            duration_ms = start.elapsed().as_millis() as u64,
            "Downloaded stream"
        );

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("dQw4w9WgXcQ").is_ok());
        assert!(validate_id("abc").is_err());
        assert!(validate_id("dQw4w9WgXc!").is_err());
    }

    #[test]
    fn test_convert_format_skips_ciphered() {
        let raw = RawFormat {
            itag: 22,
            url: None,
            mime_type: "video/mp4".to_string(),
            quality_label: Some("720p".to_string()),
            bitrate: 0,
            content_length: None,
        };
        assert!(convert_format(raw, false).is_none());
    }

    #[test]
    fn test_convert_format_classifies_adaptive() {
        let raw = RawFormat {
            itag: 140,
            url: Some("https://example.com/a".to_string()),
            mime_type: "audio/mp4; codecs=\"mp4a.40.2\"".to_string(),
            quality_label: None,
            bitrate: 128_000,
            content_length: Some("2048".to_string()),
        };
        let format = convert_format(raw, true).unwrap();
        assert!(format.is_audio_only());
        assert_eq!(format.content_length, Some(2048));
    }

    #[test]
    fn test_player_response_parsing() {
        let body = serde_json::json!({
            "playabilityStatus": { "status": "OK" },
            "videoDetails": {
                "title": "Test video",
                "author": "Test channel",
                "lengthSeconds": "212",
                "shortDescription": "desc",
                "viewCount": "1000"
            },
            "streamingData": {
                "formats": [{
                    "itag": 18,
                    "url": "https://example.com/18",
                    "mimeType": "video/mp4",
                    "qualityLabel": "360p",
                    "bitrate": 500000
                }],
                "adaptiveFormats": []
            },
            "microformat": {
                "playerMicroformatRenderer": { "publishDate": "2024-01-15" }
            }
        });
        let parsed: PlayerResponse = serde_json::from_value(body).unwrap();
        let details = parsed.video_details.unwrap();
        assert_eq!(details.title, "Test video");
        assert_eq!(details.length_seconds, "212");
        assert_eq!(parsed.streaming_data.unwrap().formats.len(), 1);
    }
}
