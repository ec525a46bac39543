//! CLI module for Recap.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::state::SummaryLength;
use clap::{Parser, Subcommand};
use tracing::warn;

/// Recap - YouTube video summaries with web context
///
/// Paste a YouTube link to get a summary of the video enriched with web search
/// results, or ask a study question to get a direct answer.
#[derive(Parser, Debug)]
#[command(name = "recap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a YouTube video or answer a question
    Run {
        /// YouTube URL or a question
        input: String,

        /// Summary length (short, medium, long)
        #[arg(short, long)]
        length: Option<String>,

        /// Also save the result as a text file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Start an interactive session with result history
    Session {
        /// Summary length (short, medium, long)
        #[arg(short, long)]
        length: Option<String>,
    },

    /// Start HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

/// Resolve a requested summary length, falling back to `default` when the
/// value is missing or not recognized.
pub fn resolve_length(requested: Option<&str>, default: SummaryLength) -> SummaryLength {
    match requested {
        None => default,
        Some(value) => value.parse().unwrap_or_else(|e| {
            warn!("{}; using {}", e, default);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_length() {
        assert_eq!(resolve_length(None, SummaryLength::Long), SummaryLength::Long);
        assert_eq!(
            resolve_length(Some("Short"), SummaryLength::Medium),
            SummaryLength::Short
        );
        assert_eq!(
            resolve_length(Some("tiny"), SummaryLength::Medium),
            SummaryLength::Medium
        );
    }

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::parse_from(["recap", "-v", "run", "https://youtu.be/x", "--length", "long"]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Run { input, length, output } => {
                assert_eq!(input, "https://youtu.be/x");
                assert_eq!(length.as_deref(), Some("long"));
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
