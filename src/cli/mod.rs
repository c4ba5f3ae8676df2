//! Command-line interface for Recall.
//!
//! `serve` and `init` act locally, every other command talks to a running
//! server over HTTP.

pub mod client;
pub mod commands;
pub mod display;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use client::ApiClient;

/// Recall - archive web pages and search them later
#[derive(Debug, Parser)]
#[command(name = "recall")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (default: ./config.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Server URL, overrides `client.server_url`
    #[arg(short = 's', long, global = true, env = "RECALL_SERVER")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    Init,

    /// Search through saved pages
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,

        /// Maximum number of results (server default when omitted)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only return pages carrying this tag (repeatable)
        #[arg(short, long = "tags")]
        tags: Vec<String>,

        /// Match the query as a whole word
        #[arg(short, long, conflicts_with = "all_terms")]
        whole: bool,

        /// Match pages containing every term, in any order
        #[arg(short, long)]
        all_terms: bool,

        /// Search page titles instead of page text
        #[arg(long)]
        title: bool,
    },

    /// Save a URL to the archive
    #[command(alias = "add")]
    Save {
        url: String,

        /// Tags to add to the saved page (repeatable)
        #[arg(short, long = "tags")]
        tags: Vec<String>,
    },

    /// Open a saved page in the browser
    #[command(alias = "o")]
    Open {
        /// Site ID
        id: i32,

        /// Open the original URL rather than the archived copy
        #[arg(short, long)]
        original: bool,
    },

    /// Print the original URL of a saved page
    Url {
        /// Site ID
        id: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::parse_from([
            "recall", "search", "hello", "world", "-l", "3", "-t", "news", "-t", "2024", "-w",
        ]);
        match cli.command {
            Commands::Search {
                query,
                limit,
                tags,
                whole,
                all_terms,
                title,
            } => {
                assert_eq!(query, vec!["hello", "world"]);
                assert_eq!(limit, Some(3));
                assert_eq!(tags, vec!["news", "2024"]);
                assert!(whole);
                assert!(!all_terms);
                assert!(!title);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_whole_conflicts_with_all_terms() {
        assert!(Cli::try_parse_from(["recall", "search", "x", "-w", "-a"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "recall",
            "open",
            "7",
            "--original",
            "--server",
            "http://archive.lan:9000",
        ]);
        assert_eq!(cli.server.as_deref(), Some("http://archive.lan:9000"));
        assert!(matches!(
            cli.command,
            Commands::Open {
                id: 7,
                original: true
            }
        ));
    }
}
