use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::OutputFormat;
use crate::pipeline::NotesDocument;
use crate::transcript::Transcript;

/// Render a notes document in the requested format.
pub fn render_document(doc: &NotesDocument, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_document_text(doc)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(doc).context("Failed to serialize notes")
        }
        OutputFormat::Markdown => Ok(render_document_markdown(doc)),
    }
}

/// Render a transcript in the requested format.
pub fn render_transcript(transcript: &Transcript, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(transcript.text()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(transcript).context("Failed to serialize transcript")
        }
        OutputFormat::Markdown => Ok(format!(
            "# Transcript: {}\n\n{}\n",
            transcript.video_id,
            transcript.text()
        )),
    }
}

fn render_document_text(doc: &NotesDocument) -> String {
    let mut out = String::new();

    out.push_str("Detailed Notes\n");
    out.push_str("==============\n\n");
    if let Some(title) = &doc.title {
        out.push_str(&format!("Video:     {}\n", title));
    }
    if let Some(channel) = &doc.channel {
        out.push_str(&format!("Channel:   {}\n", channel));
    }
    out.push_str(&format!("Link:      {}\n", doc.source_url));
    out.push_str(&format!("Thumbnail: {}\n", doc.thumbnail_url));
    out.push_str(&format!("Model:     {}\n\n", doc.model));
    out.push_str(&doc.summary);
    out.push('\n');

    out
}

fn render_document_markdown(doc: &NotesDocument) -> String {
    let mut md = String::new();

    md.push_str("## Detailed Notes: ");
    md.push_str(doc.title.as_deref().unwrap_or(doc.video_id.as_str()));
    md.push_str("\n\n");

    if let Some(channel) = &doc.channel {
        md.push_str(&format!("by {}\n\n", channel));
    }

    md.push_str(&format!("![thumbnail]({})\n\n", doc.thumbnail_url));
    md.push_str(&format!("[Watch on YouTube]({})\n\n", doc.source_url));
    md.push_str(&doc.summary);
    md.push_str(&format!(
        "\n\n---\n*Generated by {} at {}*\n",
        doc.model,
        doc.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    md
}

/// Save rendered output to a file.
pub async fn save_to_file(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs_err::create_dir_all(parent)?;
        }
    }

    fs_err::write(path, content).context("Failed to write output file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver;

    fn document() -> NotesDocument {
        NotesDocument {
            video_id: resolver::resolve("https://youtu.be/abc123").unwrap(),
            source_url: "https://youtu.be/abc123".to_string(),
            title: Some("A Video".to_string()),
            channel: Some("A Channel".to_string()),
            thumbnail_url: "http://img.youtube.com/vi/abc123/0.jpg".to_string(),
            transcript_language: "en".to_string(),
            model: "gemini-1.5-flash".to_string(),
            summary: "The key points.".to_string(),
            generated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_text_rendering_contains_summary_and_metadata() {
        let out = render_document(&document(), &OutputFormat::Text).unwrap();
        assert!(out.contains("Detailed Notes"));
        assert!(out.contains("A Video"));
        assert!(out.contains("The key points."));
        assert!(out.contains("http://img.youtube.com/vi/abc123/0.jpg"));
    }

    #[test]
    fn test_json_rendering_is_valid_json() {
        let out = render_document(&document(), &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["video_id"], "abc123");
        assert_eq!(value["summary"], "The key points.");
    }

    #[test]
    fn test_markdown_rendering_falls_back_to_video_id() {
        let mut doc = document();
        doc.title = None;
        let out = render_document(&doc, &OutputFormat::Markdown).unwrap();
        assert!(out.contains("## Detailed Notes: abc123"));
    }

    #[test]
    fn test_transcript_text_rendering_is_flat_text() {
        use crate::transcript::CaptionFragment;

        let transcript = Transcript {
            video_id: resolver::resolve("https://youtu.be/abc123").unwrap(),
            language: "en".to_string(),
            auto_generated: false,
            fragments: vec![
                CaptionFragment {
                    text: "hello".to_string(),
                    start: 0.0,
                    duration: 1.0,
                },
                CaptionFragment {
                    text: "world".to_string(),
                    start: 1.0,
                    duration: 1.0,
                },
            ],
        };

        let out = render_transcript(&transcript, &OutputFormat::Text).unwrap();
        assert_eq!(out, "hello world");
    }
}
