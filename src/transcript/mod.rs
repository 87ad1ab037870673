use anyhow::Context;
use reqwest::Client;
use serde::Serialize;

use crate::resolver::VideoId;
use crate::{NotesError, Result};

pub mod track;

const WATCH_BASE: &str = "https://www.youtube.com";

// Caption tracks are only embedded in the watch page for browser-like agents.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

/// One timed unit of spoken-text data returned by the caption service.
///
/// Only `text` is consumed downstream; timing is kept for structured output.
#[derive(Debug, Clone, Serialize)]
pub struct CaptionFragment {
    /// Fragment text
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

/// Flattened transcript of a single video.
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    /// Video the transcript belongs to
    pub video_id: VideoId,

    /// Language code of the selected caption track
    pub language: String,

    /// Whether the track was auto-generated rather than manually authored
    pub auto_generated: bool,

    /// Ordered caption fragments as returned by the service
    pub fragments: Vec<CaptionFragment>,
}

impl Transcript {
    /// Concatenate all fragment texts with single-space separators,
    /// preserving sequence order.
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Client for the caption-track retrieval flow.
pub struct TranscriptClient {
    http: Client,
    watch_base: String,
}

impl TranscriptClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            watch_base: WATCH_BASE.to_string(),
        })
    }

    /// Client pointed at an alternative watch-page host.
    #[cfg(test)]
    pub(crate) fn with_watch_base(watch_base: &str) -> Result<Self> {
        let mut client = Self::new()?;
        client.watch_base = watch_base.to_string();
        Ok(client)
    }

    /// Fetch the transcript for a video, preferring the given language codes.
    ///
    /// Every failure from the external service (no captions, access denied,
    /// network failure, parse failure) is folded into a single
    /// `TranscriptUnavailable` error carrying the technical detail.
    pub async fn fetch(&self, video_id: &VideoId, languages: &[String]) -> Result<Transcript> {
        self.fetch_inner(video_id, languages)
            .await
            .map_err(|e| {
                NotesError::TranscriptUnavailable {
                    video_id: video_id.to_string(),
                    detail: format!("{:#}", e),
                }
                .into()
            })
    }

    async fn fetch_inner(&self, video_id: &VideoId, languages: &[String]) -> Result<Transcript> {
        tracing::debug!("Fetching watch page for video: {}", video_id);

        let response = self
            .http
            .get(format!("{}/watch", self.watch_base))
            .query(&[("v", video_id.as_str()), ("hl", "en")])
            .send()
            .await
            .context("Failed to fetch the video watch page")?;

        if !response.status().is_success() {
            anyhow::bail!("Watch page returned HTTP {}", response.status());
        }

        let html = response.text().await.context("Failed to read watch page")?;
        let tracks = track::extract_caption_tracks(&html)?;

        let selected = track::select_track(&tracks, languages)
            .ok_or_else(|| anyhow::anyhow!("No caption track available"))?;

        tracing::debug!(
            "Selected caption track: language={} auto_generated={}",
            selected.language_code,
            selected.is_auto_generated()
        );

        let response = self
            .http
            .get(&selected.base_url)
            .query(&[("fmt", "json3")])
            .send()
            .await
            .context("Failed to fetch the caption track")?;

        if !response.status().is_success() {
            anyhow::bail!("Caption track returned HTTP {}", response.status());
        }

        let raw = response.text().await.context("Failed to read caption track")?;
        let fragments = track::parse_json3(&raw)?;

        if fragments.is_empty() {
            anyhow::bail!("Caption track contains no text");
        }

        Ok(Transcript {
            video_id: video_id.clone(),
            language: selected.language_code.clone(),
            auto_generated: selected.is_auto_generated(),
            fragments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver;

    fn transcript_with(texts: &[&str]) -> Transcript {
        Transcript {
            video_id: resolver::resolve("https://youtu.be/abc123").unwrap(),
            language: "en".to_string(),
            auto_generated: false,
            fragments: texts
                .iter()
                .enumerate()
                .map(|(i, t)| CaptionFragment {
                    text: t.to_string(),
                    start: i as f64,
                    duration: 1.0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_text_is_space_joined_and_order_preserving() {
        let transcript = transcript_with(&["hello", "world"]);
        assert_eq!(transcript.text(), "hello world");
    }

    #[test]
    fn test_text_of_empty_transcript() {
        let transcript = transcript_with(&[]);
        assert_eq!(transcript.text(), "");
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_text_keeps_service_order() {
        let transcript = transcript_with(&["third", "first", "second"]);
        assert_eq!(transcript.text(), "third first second");
    }

    #[tokio::test]
    async fn test_fetch_folds_service_failures_into_transcript_unavailable() {
        // Unroutable watch-page host; the network failure must come back as
        // the single enumerated-reasons error, not an unhandled fault.
        let client = TranscriptClient::with_watch_base("http://127.0.0.1:9").unwrap();
        let video_id = resolver::resolve("https://youtu.be/abc123").unwrap();

        let err = client
            .fetch(&video_id, &["en".to_string()])
            .await
            .unwrap_err();

        match err.downcast_ref::<NotesError>() {
            Some(NotesError::TranscriptUnavailable { video_id, detail }) => {
                assert_eq!(video_id, "abc123");
                assert!(!detail.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let message = err.to_string();
        assert!(message.contains("subtitles are disabled"));
        assert!(message.contains("private or unavailable"));
        assert!(message.contains("region-locked"));
    }
}
