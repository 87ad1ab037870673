use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ytnotes",
    about = "Turn YouTube videos into detailed notes using caption transcripts and Google Gemini",
    version,
    long_about = "A CLI tool that extracts the caption transcript of a YouTube video and \
                  summarizes it into detailed notes with Google's Gemini generative-language API. \
                  Accepts watch URLs, youtu.be short links, and shorts URLs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize a video into detailed notes
    Summarize {
        /// Video URL (watch, youtu.be, or shorts)
        #[arg(value_name = "URL")]
        url: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Preferred caption language code (e.g. en, de)
        #[arg(short, long, value_name = "LANG")]
        language: Option<String>,

        /// Word budget passed to the model (default from config, 800)
        #[arg(long, value_name = "COUNT")]
        max_words: Option<usize>,
    },

    /// Fetch only the transcript of a video
    Transcript {
        /// Video URL (watch, youtu.be, or shorts)
        #[arg(value_name = "URL")]
        url: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Preferred caption language code (e.g. en, de)
        #[arg(short, long, value_name = "LANG")]
        language: Option<String>,
    },

    /// Extract the video identifier and thumbnail URL from a link
    Resolve {
        /// Video URL (watch, youtu.be, or shorts)
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Inspect configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON with metadata
    Json,
    /// Markdown notes
    Markdown,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}
