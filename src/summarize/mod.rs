use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{NotesError, Result};

/// Default word budget passed to the model. Not enforced locally.
pub const DEFAULT_MAX_WORDS: usize = 800;

/// Default Gemini model identifier.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// External generative-language service: maps a prompt string to a response
/// string. One production implementation (`GeminiClient`); mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    fn model_id(&self) -> &str;
}

/// Client for Google's Gemini `generateContent` endpoint.
#[derive(Debug)]
pub struct GeminiClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Build a client with an explicit API key and model identifier.
    ///
    /// The key is validated here so a missing key fails at construction
    /// rather than on the first request.
    pub fn new(api_key: String, model: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(NotesError::ConfigError(
                "missing Gemini API key (set GOOGLE_API_KEY or gemini.api_key in the config file)"
                    .to_string(),
            )
            .into());
        }
        if model.trim().is_empty() {
            return Err(NotesError::ConfigError("Gemini model must not be empty".to_string()).into());
        }

        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: GEMINI_ENDPOINT.to_string(),
            api_key,
            model,
        })
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        tracing::debug!("Submitting prompt to model: {}", self.model);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .context("Failed to reach the generative-language service")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Service returned HTTP {}: {}", status, truncate(&body, 500));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse the model response")?;

        parsed
            .first_text()
            .ok_or_else(|| anyhow::anyhow!("Model returned no candidates"))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

/// Prompt assembly plus the single summarization call.
///
/// Holds the model as a trait object so the external service can be
/// substituted in tests.
pub struct Summarizer {
    model: Box<dyn GenerativeModel>,
    max_words: usize,
}

impl Summarizer {
    pub fn new(model: Box<dyn GenerativeModel>, max_words: usize) -> Self {
        Self { model, max_words }
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    /// Concatenate the instruction prefix and the transcript into one prompt.
    pub fn build_prompt(&self, transcript: &str) -> String {
        format!(
            "You are a YouTube video summarizer. You will take the transcript text, \
             summarize the entire video, and provide the important points within {} words. \
             Please provide the summary of the text given here:\n\n{}",
            self.max_words, transcript
        )
    }

    /// Summarize a transcript. Any service fault is folded into a
    /// `SummarizationFailed` error so the caller can render all pipeline
    /// stages uniformly.
    pub async fn summarize(&self, transcript: &str) -> Result<String> {
        let prompt = self.build_prompt(transcript);

        self.model
            .generate(&prompt)
            .await
            .map_err(|e| NotesError::SummarizationFailed(format!("{:#}", e)).into())
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;
        if content.parts.is_empty() {
            return None;
        }
        Some(
            content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<String>(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    }
}
