//! Stream format selection
//!
//! Selection policy: audio-only requests take the highest-bitrate audio
//! stream. Video requests prefer combined (video+audio) streams at the
//! requested height, fall back to video-only at that height, and `best`
//! simply takes the tallest combined stream available.

use crate::error::ResolveError;
use crate::models::{MediaDescriptor, Quality, StreamFormat};

/// Pick the stream to download, or fail if nothing fits the request.
pub fn choose_format<'a>(
    descriptor: &'a MediaDescriptor,
    quality: Quality,
    audio_only: bool,
) -> Result<&'a StreamFormat, ResolveError> {
    if audio_only {
        return descriptor
            .formats
            .iter()
            .filter(|f| f.is_audio_only())
            .max_by_key(|f| f.bitrate)
            .ok_or_else(|| ResolveError::NoMatchingFormat {
                requested: "audio".to_string(),
            });
    }

    let tallest = |formats: &'a [StreamFormat], pred: fn(&StreamFormat) -> bool| {
        formats
            .iter()
            .filter(|f| pred(f))
            .max_by_key(|f| (f.height().unwrap_or(0), f.bitrate))
    };

    let chosen = match quality {
        Quality::Best => tallest(&descriptor.formats, StreamFormat::is_combined)
            .or_else(|| tallest(&descriptor.formats, StreamFormat::is_video_only)),
        Quality::Height(height) => {
            let at_height = descriptor
                .formats
                .iter()
                .filter(|f| f.is_combined() && f.height() == Some(height))
                .max_by_key(|f| f.bitrate);
            // Video-only at the exact height is better than nothing, but a
            // combined stream is always preferred when present.
            at_height.or_else(|| {
                descriptor
                    .formats
                    .iter()
                    .filter(|f| f.is_video_only() && f.height() == Some(height))
                    .max_by_key(|f| f.bitrate)
            })
        }
    };

    chosen.ok_or_else(|| ResolveError::NoMatchingFormat {
        requested: quality.to_string(),
    })
}
