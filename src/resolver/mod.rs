use url::Url;

use crate::{NotesError, Result};

/// Hosts that serve the standard watch URL shape.
const WATCH_HOSTS: &[&str] = &["youtube.com", "www.youtube.com"];

/// Host that serves the short-link URL shape.
const SHORT_HOST: &str = "youtu.be";

/// A platform-assigned video identifier extracted from a URL.
///
/// Identifiers are restricted to the platform's character class
/// (`[A-Za-z0-9_-]`). Length is not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct VideoId(String);

impl VideoId {
    fn new(raw: &str) -> Result<Self> {
        if raw.is_empty()
            || !raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(NotesError::UnsupportedUrl(format!(
                "'{}' is not a valid video identifier",
                raw
            ))
            .into());
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Thumbnail image URL for this video.
    pub fn thumbnail_url(&self) -> String {
        format!("http://img.youtube.com/vi/{}/0.jpg", self.0)
    }

    /// Canonical watch URL for this video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extract a video identifier from a YouTube URL.
///
/// Recognizes three address shapes:
/// - `youtube.com/watch?v=ID` (standard watch URL)
/// - `youtu.be/ID` (short link)
/// - any URL whose path contains a `shorts` segment (`/shorts/ID`)
///
/// Deliberately narrow: embed URLs, playlist URLs, and anything else yield an
/// `UnsupportedUrl` error. Pure function of the input string.
pub fn resolve(input: &str) -> Result<VideoId> {
    let input = input.trim();

    let parsed = Url::parse(input)
        .map_err(|e| NotesError::UnsupportedUrl(format!("'{}': {}", input, e)))?;

    let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();
    let segments: Vec<&str> = parsed.path().split('/').collect();

    // Shorts URLs carry the identifier as the third path segment. A shorts
    // path with no identifier segment is a defined error, not an index fault.
    if segments.iter().any(|s| *s == "shorts") {
        let id = segments
            .get(2)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                NotesError::UnsupportedUrl(format!(
                    "shorts URL is missing a video identifier: '{}'",
                    input
                ))
            })?;
        return VideoId::new(id);
    }

    if WATCH_HOSTS.contains(&host.as_str()) {
        let id = parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned());

        return match id {
            Some(v) if !v.is_empty() => VideoId::new(&v),
            _ => Err(NotesError::UnsupportedUrl(format!(
                "watch URL is missing the 'v' query parameter: '{}'",
                input
            ))
            .into()),
        };
    }

    if host == SHORT_HOST {
        let seg = parsed
            .path_segments()
            .and_then(|mut s| s.next())
            .unwrap_or("");
        if seg.is_empty() {
            return Err(NotesError::UnsupportedUrl(format!(
                "short link is missing a video identifier: '{}'",
                input
            ))
            .into());
        }
        return VideoId::new(seg);
    }

    Err(NotesError::UnsupportedUrl(format!("'{}'", input)).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        let id = resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_watch_url_without_www() {
        let id = resolve("https://youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_short_link() {
        let id = resolve("https://youtu.be/xyz789").unwrap();
        assert_eq!(id.as_str(), "xyz789");
    }

    #[test]
    fn test_shorts_url() {
        let id = resolve("https://www.youtube.com/shorts/dQw4w9WgXcQ").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_shorts_url_missing_id() {
        assert!(resolve("https://www.youtube.com/shorts").is_err());
        assert!(resolve("https://www.youtube.com/shorts/").is_err());
    }

    #[test]
    fn test_watch_url_missing_v_parameter() {
        assert!(resolve("https://www.youtube.com/watch?t=120").is_err());
    }

    #[test]
    fn test_unrecognized_host() {
        assert!(resolve("https://example.com/video").is_err());
        assert!(resolve("https://example.com/notavideo").is_err());
    }

    #[test]
    fn test_malformed_url() {
        assert!(resolve("not a url").is_err());
        assert!(resolve("").is_err());
    }

    #[test]
    fn test_identifier_character_class() {
        assert!(resolve("https://youtu.be/bad%20id").is_err());
    }

    #[test]
    fn test_idempotent() {
        let url = "https://www.youtube.com/watch?v=abc123";
        assert_eq!(resolve(url).unwrap(), resolve(url).unwrap());
    }

    #[test]
    fn test_thumbnail_url() {
        let id = resolve("https://www.youtube.com/watch?v=abc123").unwrap();
        assert_eq!(
            id.thumbnail_url(),
            "http://img.youtube.com/vi/abc123/0.jpg"
        );
    }

    #[test]
    fn test_watch_url_shape_roundtrip() {
        let id = resolve("https://youtu.be/abc123").unwrap();
        assert_eq!(id.watch_url(), "https://www.youtube.com/watch?v=abc123");
    }
}
