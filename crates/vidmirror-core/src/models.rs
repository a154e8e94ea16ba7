//! Typed records for the mirrored-download workflow.
//!
//! The original duck-typed metadata dictionaries become explicit records
//! here, validated once at construction and immutable afterwards.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One remote video to mirror.
///
/// Constructed transiently per download attempt from resolver output; never
/// persisted as its own record. It is folded into the [`MetadataRecord`] that
/// accompanies the payload in the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    /// Opaque external identifier, unique key for all derived artifact names.
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub duration_seconds: u64,
    /// Human-readable quality/container descriptor of the chosen stream.
    #[serde(default)]
    pub selected_format_label: String,
}

/// Durable sidecar describing a mirrored artifact.
///
/// Written once next to the payload (`{id}.json` beside `{id}.{ext}`) and
/// never updated in place: a re-run either skips entirely or re-creates both
/// objects of the pair together.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    pub video_id: String,
    pub url: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub length_seconds: u64,
    pub view_count: u64,
    pub publish_date: String,
    pub download_date: String,
    pub filename: String,
}

impl MetadataRecord {
    /// Fold a [`MediaItem`] plus descriptive fields into the durable record.
    /// `download_date` is stamped at construction time.
    pub fn new(
        item: &MediaItem,
        url: String,
        description: String,
        view_count: u64,
        publish_date: String,
        filename: String,
    ) -> Self {
        MetadataRecord {
            video_id: item.id.clone(),
            url,
            title: item.title.clone(),
            author: item.author.clone(),
            description,
            length_seconds: item.duration_seconds,
            view_count,
            publish_date,
            download_date: Utc::now().to_rfc3339(),
            filename,
        }
    }

    /// Object-store metadata attached to both objects of the pair.
    ///
    /// Values are sanitized by the gateway before being sent, since the
    /// transport constrains header values.
    pub fn object_metadata(&self) -> HashMap<String, String> {
        HashMap::from([
            ("video-id".to_string(), self.video_id.clone()),
            ("title".to_string(), self.title.clone()),
            ("author".to_string(), self.author.clone()),
            ("download-date".to_string(), self.download_date.clone()),
        ])
    }
}

/// Where a [`PlaylistRecord`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Channel,
    Playlist,
}

/// A richer batch input: a previously fetched channel or playlist listing.
/// Read-only input to the batch driver; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRecord {
    pub total_videos: u64,
    pub fetched_at: String,
    pub source_type: SourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
    /// How many days back the listing covered; descriptive only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    pub videos: Vec<MediaItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> MediaItem {
        MediaItem {
            id: "dQw4w9WgXcQ".to_string(),
            title: "Test Video".to_string(),
            author: "Test Channel".to_string(),
            duration_seconds: 212,
            selected_format_label: "720p (video/mp4)".to_string(),
        }
    }

    #[test]
    fn test_metadata_record_folds_media_item() {
        let record = MetadataRecord::new(
            &item(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            "A description".to_string(),
            42,
            "2009-10-25".to_string(),
            "dQw4w9WgXcQ.mp4".to_string(),
        );

        assert_eq!(record.video_id, "dQw4w9WgXcQ");
        assert_eq!(record.title, "Test Video");
        assert_eq!(record.length_seconds, 212);
        assert_eq!(record.filename, "dQw4w9WgXcQ.mp4");
        assert!(!record.download_date.is_empty());
    }

    #[test]
    fn test_metadata_record_serializes_camel_case() {
        let record = MetadataRecord::new(
            &item(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            String::new(),
            0,
            String::new(),
            "dQw4w9WgXcQ.mp4".to_string(),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("videoId").is_some());
        assert!(json.get("lengthSeconds").is_some());
        assert!(json.get("downloadDate").is_some());
        assert!(json.get("video_id").is_none());
    }

    #[test]
    fn test_playlist_record_round_trip() {
        let json = r#"{
            "totalVideos": 2,
            "fetchedAt": "2025-01-15T10:00:00Z",
            "sourceType": "channel",
            "channelHandle": "@somechannel",
            "days": 30,
            "videos": [
                { "id": "aaaaaaaaaaa", "title": "First" },
                { "id": "bbbbbbbbbbb" }
            ]
        }"#;

        let record: PlaylistRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.total_videos, 2);
        assert_eq!(record.source_type, SourceType::Channel);
        assert_eq!(record.channel_handle.as_deref(), Some("@somechannel"));
        assert!(record.playlist_id.is_none());
        assert_eq!(record.videos.len(), 2);
        assert_eq!(record.videos[1].id, "bbbbbbbbbbb");
        assert!(record.videos[1].title.is_empty());
    }

    #[test]
    fn test_object_metadata_keys() {
        let record = MetadataRecord::new(
            &item(),
            String::new(),
            String::new(),
            0,
            String::new(),
            "dQw4w9WgXcQ.mp4".to_string(),
        );
        let meta = record.object_metadata();
        assert_eq!(meta.get("video-id").map(String::as_str), Some("dQw4w9WgXcQ"));
        assert_eq!(meta.get("title").map(String::as_str), Some("Test Video"));
    }
}
