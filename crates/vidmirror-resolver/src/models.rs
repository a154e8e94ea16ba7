//! Resolver data model
//!
//! A [`MediaDescriptor`] is what a successful resolve yields: identity fields
//! plus the flat list of stream formats the remote service offered. Format
//! selection happens afterwards, in the `format` module.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Everything known about a remote video before downloading it.
#[derive(Debug, Clone)]
pub struct MediaDescriptor {
    pub id: String,
    pub title: String,
    pub author: String,
    pub duration_seconds: u64,
    pub description: String,
    pub view_count: u64,
    pub publish_date: String,
    pub formats: Vec<StreamFormat>,
}

/// One downloadable stream variant.
#[derive(Debug, Clone)]
pub struct StreamFormat {
    pub itag: i64,
    pub url: String,
    pub mime_type: String,
    pub quality_label: Option<String>,
    pub bitrate: u64,
    pub content_length: Option<u64>,
    pub has_video: bool,
    pub has_audio: bool,
}

impl StreamFormat {
    pub fn is_combined(&self) -> bool {
        self.has_video && self.has_audio
    }

    pub fn is_audio_only(&self) -> bool {
        self.has_audio && !self.has_video
    }

    pub fn is_video_only(&self) -> bool {
        self.has_video && !self.has_audio
    }

    /// Vertical resolution parsed from the quality label, e.g. `720p` -> 720.
    pub fn height(&self) -> Option<u32> {
        let label = self.quality_label.as_deref()?;
        let digits: String = label.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }

    /// Human-readable label for logs and metadata.
    pub fn label(&self) -> String {
        match &self.quality_label {
            Some(label) => label.clone(),
            None if self.is_audio_only() => format!("audio/{}kbps", self.bitrate / 1000),
            None => format!("itag {}", self.itag),
        }
    }
}

/// Requested download quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    /// Highest available resolution.
    Best,
    /// A specific vertical resolution, e.g. 720.
    Height(u32),
}

#[derive(Debug, Error)]
#[error("Invalid quality '{0}': expected 'best' or a resolution like '720p'")]
pub struct ParseQualityError(pub String);

impl FromStr for Quality {
    type Err = ParseQualityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        if lowered == "best" {
            return Ok(Quality::Best);
        }
        let digits = lowered.strip_suffix('p').unwrap_or(&lowered);
        digits
            .parse::<u32>()
            .map(Quality::Height)
            .map_err(|_| ParseQualityError(s.to_string()))
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Best => write!(f, "best"),
            Quality::Height(h) => write!(f, "{}p", h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(quality_label: Option<&str>, has_video: bool, has_audio: bool) -> StreamFormat {
        StreamFormat {
            itag: 22,
            url: "https://example.com/stream".to_string(),
            mime_type: "video/mp4".to_string(),
            quality_label: quality_label.map(str::to_string),
            bitrate: 128_000,
            content_length: Some(1024),
            has_video,
            has_audio,
        }
    }

    #[test]
    fn test_height_parses_quality_label() {
        assert_eq!(format(Some("720p"), true, true).height(), Some(720));
        assert_eq!(format(Some("1080p60"), true, false).height(), Some(1080));
        assert_eq!(format(None, false, true).height(), None);
    }

    #[test]
    fn test_format_classification() {
        assert!(format(Some("720p"), true, true).is_combined());
        assert!(format(None, false, true).is_audio_only());
        assert!(format(Some("1080p"), true, false).is_video_only());
    }

    #[test]
    fn test_quality_from_str() {
        assert_eq!("best".parse::<Quality>().unwrap(), Quality::Best);
        assert_eq!("720p".parse::<Quality>().unwrap(), Quality::Height(720));
        assert_eq!("1080".parse::<Quality>().unwrap(), Quality::Height(1080));
        assert!("ultra".parse::<Quality>().is_err());
    }

    #[test]
    fn test_quality_display_round_trip() {
        assert_eq!(Quality::Best.to_string(), "best");
        assert_eq!(Quality::Height(480).to_string(), "480p");
    }
}
