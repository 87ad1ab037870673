use clap::Parser;
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_notes::cli::{Cli, Commands};
use yt_notes::config::Config;
use yt_notes::pipeline::NotesPipeline;
use yt_notes::{output, resolver};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                if cli.verbose {
                    "yt_notes=debug".into()
                } else {
                    "yt_notes=info".into()
                }
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // All pipeline stages fold their failures into Result values; this is the
    // single place where any of them becomes user-visible output.
    if let Err(err) = run(cli).await {
        eprintln!("{} {:#}", style("error:").red().bold(), err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Resolve { url } => {
            // Pure and offline; needs no configuration.
            let video_id = resolver::resolve(&url)?;
            println!("Video ID:  {}", video_id);
            println!("Thumbnail: {}", video_id.thumbnail_url());
        }
        Commands::Summarize {
            url,
            output,
            format,
            language,
            max_words,
        } => {
            let mut config = Config::load().await?;
            if let Some(lang) = language {
                config.transcript.languages = vec![lang];
            }
            if let Some(words) = max_words {
                config.gemini.max_words = words;
            }

            let pipeline = NotesPipeline::new(&config, cli.quiet)?;

            tracing::info!("Starting summarization for URL: {}", url);
            let document = pipeline.run(&url).await?;

            let rendered = output::render_document(&document, &format)?;
            match output {
                Some(path) => {
                    output::save_to_file(&rendered, &path).await?;
                    println!("Notes saved to: {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }
        Commands::Transcript {
            url,
            output,
            format,
            language,
        } => {
            let mut config = Config::load().await?;
            if let Some(lang) = language {
                config.transcript.languages = vec![lang];
            }

            let pipeline = NotesPipeline::transcript_only(&config, cli.quiet)?;

            tracing::info!("Fetching transcript for URL: {}", url);
            let transcript = pipeline.fetch_transcript(&url).await?;

            let rendered = output::render_transcript(&transcript, &format)?;
            match output {
                Some(path) => {
                    output::save_to_file(&rendered, &path).await?;
                    println!("Transcript saved to: {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }
        Commands::Config { show } => {
            let config = Config::load().await?;
            if show {
                config.display();
            } else {
                println!("Edit the config file to change settings:");
                println!("  {}", Config::path_hint()?.display());
            }
        }
    }

    Ok(())
}
