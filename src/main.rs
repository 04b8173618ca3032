use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tubescript::cli::{Cli, Commands};
use tubescript::config::Config;
use tubescript::output;
use tubescript::server;
use tubescript::sources::youtube::YoutubeSource;
use tubescript::transcript::TranscriptPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "tubescript=debug,actix_web=info" } else { "tubescript=info,actix_web=info" };
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| default_filter.into()),
    );
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    if cli.log_json {
        registry.with(fmt_layer.json()).init();
    } else {
        registry.with(fmt_layer).init();
    }

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_addr = bind;
                config.validate()?;
            }

            let pipeline = TranscriptPipeline::new(YoutubeSource::new(&config.youtube)?);
            server::run(&config.server, pipeline).await?;
        }
        Commands::Fetch {
            url,
            language,
            output,
            format,
        } => {
            let pipeline = TranscriptPipeline::new(YoutubeSource::new(&config.youtube)?);

            let outcome = match pipeline.run(&url, language.as_deref()).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::debug!("Fetch failed: {:?}", err);
                    eprintln!("{}", err.user_message());
                    std::process::exit(1);
                }
            };

            tracing::info!(
                "Fetched {} lines in '{}' for {}",
                outcome.entries.len(),
                outcome.selected_language,
                outcome.video_id
            );

            match output {
                Some(path) => {
                    output::save_to_file(&outcome, &path, &format)?;
                    println!("Transcript saved to: {}", path.display());
                }
                None => {
                    output::print_to_console(&outcome, &format)?;
                }
            }
        }
        Commands::Languages { url } => {
            let pipeline = TranscriptPipeline::new(YoutubeSource::new(&config.youtube)?);

            match pipeline.languages(&url).await {
                Ok((video_id, languages)) => {
                    println!("Caption languages for {}:", video_id);
                    for language in languages {
                        println!("  • {} ({})", language.name, language.code);
                    }
                }
                Err(err) => {
                    eprintln!("{}", err.user_message());
                    std::process::exit(1);
                }
            }
        }
        Commands::Config { show, init } => {
            if init {
                let path = Config::default().save()?;
                println!("Default configuration written to: {}", path.display());
            } else if show {
                config.display();
            } else {
                config.display();
                println!();
                println!("Edit the YAML file to change settings, or run `tubescript config --init` to create it.");
            }
        }
    }

    Ok(())
}
