use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::config::Config;
use crate::metadata::MetadataClient;
use crate::resolver::{self, VideoId};
use crate::summarize::{GeminiClient, Summarizer};
use crate::transcript::{Transcript, TranscriptClient};
use crate::Result;

/// Render-ready result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct NotesDocument {
    /// Extracted video identifier
    pub video_id: VideoId,

    /// URL the user supplied
    pub source_url: String,

    /// Video title, if metadata lookup succeeded
    pub title: Option<String>,

    /// Channel name, if metadata lookup succeeded
    pub channel: Option<String>,

    /// Thumbnail image URL derived from the identifier
    pub thumbnail_url: String,

    /// Language of the caption track that was summarized
    pub transcript_language: String,

    /// Model that produced the summary
    pub model: String,

    /// The summary text, verbatim from the model
    pub summary: String,

    /// Timestamp when the summary was produced
    pub generated_at: DateTime<Utc>,
}

/// Linear summarization pipeline: resolve, fetch transcript, summarize.
///
/// Each invocation recomputes everything from the input URL; nothing is
/// cached across runs. The first failing stage short-circuits the rest.
pub struct NotesPipeline {
    transcript_client: TranscriptClient,
    metadata_client: MetadataClient,
    summarizer: Option<Summarizer>,
    languages: Vec<String>,
    quiet: bool,
}

impl NotesPipeline {
    /// Build the full pipeline from configuration.
    ///
    /// The Gemini API key is resolved eagerly here, so a missing key is a
    /// configuration error up front rather than a failure mid-pipeline.
    pub fn new(config: &Config, quiet: bool) -> Result<Self> {
        let api_key = config.resolved_api_key()?;
        let gemini = GeminiClient::new(api_key, config.gemini.model.clone())?;
        let summarizer = Summarizer::new(Box::new(gemini), config.gemini.max_words);

        let mut pipeline = Self::transcript_only(config, quiet)?;
        pipeline.summarizer = Some(summarizer);
        Ok(pipeline)
    }

    /// Build a pipeline that stops after the transcript stage.
    ///
    /// Needs no API key; used by the `transcript` command.
    pub fn transcript_only(config: &Config, quiet: bool) -> Result<Self> {
        Ok(Self {
            transcript_client: TranscriptClient::new()?,
            metadata_client: MetadataClient::new()?,
            summarizer: None,
            languages: config.transcript.languages.clone(),
            quiet,
        })
    }

    /// Run the full pipeline for a URL.
    pub async fn run(&self, url: &str) -> Result<NotesDocument> {
        let summarizer = self.summarizer.as_ref().ok_or_else(|| {
            crate::NotesError::ConfigError("pipeline was built without a summarizer".to_string())
        })?;

        let video_id = resolver::resolve(url)?;
        tracing::info!("Resolved video identifier: {}", video_id);

        // Best effort; a missing title never fails the run.
        let metadata = match self.metadata_client.fetch(&video_id).await {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::debug!("Metadata lookup failed: {:#}", e);
                None
            }
        };

        let transcript = self.fetch_transcript_with_progress(&video_id).await?;
        let text = transcript.text();

        let progress = self.spinner("Generating summary...");
        let result = summarizer.summarize(&text).await;
        Self::finish(progress, result.is_ok());
        let summary = result?;

        Ok(NotesDocument {
            thumbnail_url: video_id.thumbnail_url(),
            video_id,
            source_url: url.to_string(),
            title: metadata.as_ref().map(|m| m.title.clone()),
            channel: metadata.map(|m| m.author_name),
            transcript_language: transcript.language.clone(),
            model: summarizer.model_id().to_string(),
            summary,
            generated_at: Utc::now(),
        })
    }

    /// Run only the transcript stage for a URL.
    pub async fn fetch_transcript(&self, url: &str) -> Result<Transcript> {
        let video_id = resolver::resolve(url)?;
        tracing::info!("Resolved video identifier: {}", video_id);

        self.fetch_transcript_with_progress(&video_id).await
    }

    async fn fetch_transcript_with_progress(&self, video_id: &VideoId) -> Result<Transcript> {
        let progress = self.spinner("Fetching transcript...");
        let result = self.transcript_client.fetch(video_id, &self.languages).await;
        Self::finish(progress, result.is_ok());

        let transcript = result?;
        tracing::info!(
            "Fetched {} caption fragments ({})",
            transcript.fragments.len(),
            transcript.language
        );
        Ok(transcript)
    }

    fn spinner(&self, message: &'static str) -> Option<ProgressBar> {
        if self.quiet {
            return None;
        }

        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap(),
        );
        progress.enable_steady_tick(std::time::Duration::from_millis(100));
        progress.set_message(message);
        Some(progress)
    }

    fn finish(progress: Option<ProgressBar>, ok: bool) {
        if let Some(progress) = progress {
            if ok {
                progress.finish_and_clear();
            } else {
                progress.abandon();
            }
        }
    }
}
