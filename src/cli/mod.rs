use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tubescript",
    about = "tubescript - timestamped YouTube transcripts from a web form or the command line",
    version,
    long_about = "Resolve a YouTube URL or video ID, pick one of the caption languages the video offers and get back one `MM:SS text` line per caption. Run `serve` for the web form or `fetch` for a one-off transcript."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines instead of human-readable text
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (defaults to ./config.yaml, then the user config directory)
    #[arg(long, global = true, value_name = "FILE", env = "TUBESCRIPT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the transcript web form
    Serve {
        /// Address to listen on (overrides server.bind_addr)
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Fetch one transcript and print or save it
    Fetch {
        /// YouTube URL or 11-character video ID
        #[arg(value_name = "URL_OR_ID")]
        url: String,

        /// Caption language code (first available track if not specified)
        #[arg(short, long, value_name = "LANG")]
        language: Option<String>,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List the caption languages a video offers
    Languages {
        /// YouTube URL or 11-character video ID
        #[arg(value_name = "URL_OR_ID")]
        url: String,
    },

    /// Show or initialise the configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write the default configuration to the user config directory
        #[arg(long, conflicts_with = "show")]
        init: bool,
    },
}

#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// `MM:SS text` lines
    Text,
    /// JSON with entries, languages and the formatted text
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::parse_from(["tubescript", "fetch", "dQw4w9WgXcQ", "-l", "de", "-f", "json"]);
        match cli.command {
            Commands::Fetch { url, language, output, format } => {
                assert_eq!(url, "dQw4w9WgXcQ");
                assert_eq!(language.as_deref(), Some("de"));
                assert!(output.is_none());
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["tubescript", "serve", "--bind", "0.0.0.0:8000", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Serve { bind: Some(ref b) } if b == "0.0.0.0:8000"));
    }

    #[test]
    fn test_json_logs_flag() {
        let cli = Cli::parse_from(["tubescript", "languages", "dQw4w9WgXcQ", "--log-json"]);
        assert!(cli.log_json);
        assert!(!Cli::parse_from(["tubescript", "config"]).log_json);
    }
}
