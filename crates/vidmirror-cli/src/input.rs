//! Batch input parsing
//!
//! Two input shapes: a plain text file of ids (one per line, `#` comments
//! and blank lines ignored) and a JSON listing previously fetched from a
//! channel or playlist.

use std::path::Path;

use anyhow::Context;

use vidmirror_core::models::PlaylistRecord;

/// Read a plain id file: one id per line, trimmed; blank lines and lines
/// starting with `#` are skipped.
pub fn read_id_file(path: &Path) -> Result<Vec<String>, anyhow::Error> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read id file {}", path.display()))?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Read a JSON channel/playlist listing.
pub fn read_playlist(path: &Path) -> Result<PlaylistRecord, anyhow::Error> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read playlist file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid playlist JSON in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_read_id_file_skips_blanks_and_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# seed list").unwrap();
        writeln!(file, "dQw4w9WgXcQ").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  aaaaaaaaaaa  ").unwrap();
        file.flush().unwrap();

        let ids = read_id_file(file.path()).unwrap();
        assert_eq!(ids, vec!["dQw4w9WgXcQ", "aaaaaaaaaaa"]);
    }

    #[test]
    fn test_read_playlist() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "totalVideos": 1,
                "fetchedAt": "2025-01-15T10:00:00Z",
                "sourceType": "playlist",
                "playlistId": "PL123",
                "videos": [{{ "id": "dQw4w9WgXcQ", "title": "Test" }}]
            }}"#
        )
        .unwrap();
        file.flush().unwrap();

        let record = read_playlist(file.path()).unwrap();
        assert_eq!(record.total_videos, 1);
        assert_eq!(record.videos[0].id, "dQw4w9WgXcQ");
    }

    #[test]
    fn test_read_playlist_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        file.flush().unwrap();

        assert!(read_playlist(file.path()).is_err());
    }
}
