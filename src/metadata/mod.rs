//! Video metadata via YouTube's oEmbed API.
//!
//! Used to enrich the rendered notes with the video title, channel name, and
//! thumbnail. Metadata is best effort; the pipeline never fails because of it.

use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;

use crate::resolver::VideoId;
use crate::Result;

const OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

#[derive(Debug, Clone, Deserialize)]
pub struct VideoMetadata {
    pub title: String,

    pub author_name: String,

    pub thumbnail_url: String,
}

pub struct MetadataClient {
    http: Client,
    endpoint: String,
}

impl MetadataClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: OEMBED_ENDPOINT.to_string(),
        })
    }

    /// Client pointed at an alternative oEmbed endpoint.
    #[cfg(test)]
    pub(crate) fn with_endpoint(endpoint: &str) -> Result<Self> {
        let mut client = Self::new()?;
        client.endpoint = endpoint.to_string();
        Ok(client)
    }

    pub async fn fetch(&self, video_id: &VideoId) -> Result<VideoMetadata> {
        let oembed_url = format!(
            "{}?url={}&format=json",
            self.endpoint,
            urlencoding::encode(&video_id.watch_url())
        );

        tracing::debug!("Fetching oEmbed metadata: {}", oembed_url);

        let response = self
            .http
            .get(&oembed_url)
            .send()
            .await
            .context("Failed to reach the oEmbed endpoint")?;

        if !response.status().is_success() {
            anyhow::bail!("oEmbed endpoint returned HTTP {}", response.status());
        }

        response
            .json::<VideoMetadata>()
            .await
            .context("Failed to parse oEmbed response")
    }
}
