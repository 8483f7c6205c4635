//! CLI module for the `sabor` binary
//!
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod chat;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// El Buen Sabor - restaurant Q&A assistant
#[derive(Parser, Debug)]
#[command(
    name = "sabor",
    version,
    about = "Asistente de preguntas y respuestas del Restaurante El Buen Sabor",
    long_about = "Answers questions about the restaurant's menu, hours and policies by\n\
                  retrieving the relevant knowledge-base fragments and grounding a\n\
                  language model on them.\n\n\
                  Run without arguments to start an interactive chat.",
    after_help = "EXAMPLES:\n    \
                  sabor index --reset                      # Rebuild the vector store\n    \
                  sabor                                    # Interactive chat\n    \
                  sabor ask \"¿Cuánto cuesta el ajiaco?\"    # One-shot question\n    \
                  sabor --config my.toml stats             # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "sabor.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Interactive chat (default)
    Chat {
        /// Hide the sources under each answer
        #[arg(long)]
        no_sources: bool,
    },

    /// Ask a single question and exit
    Ask {
        /// The question
        question: String,

        /// Number of fragments to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load, chunk, embed and store the knowledge base
    Index {
        /// Knowledge-base directory (overrides rag.knowledge_base_path)
        #[arg(short, long)]
        path: Option<PathBuf>,

        #[arg(long)]
        chunk_size: Option<usize>,

        #[arg(long)]
        chunk_overlap: Option<usize>,

        /// Chunks per embedding request
        #[arg(long)]
        batch_size: Option<usize>,

        /// Wipe the vector store first
        #[arg(long)]
        reset: bool,
    },

    /// Show collection statistics
    Stats,

    /// Delete every stored vector
    Reset {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the effective configuration
    Config,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand, defaulting to `chat`.
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Chat { no_sources: false })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sabor").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_to_chat() {
        let cli = parse(&[]);
        assert_eq!(cli.config, PathBuf::from("sabor.toml"));
        assert!(!cli.verbose);
        assert_eq!(cli.command(), Commands::Chat { no_sources: false });
    }

    #[test]
    fn test_ask_with_options() {
        let cli = parse(&["--no-color", "ask", "¿Hacen domicilios?", "-k", "5", "--json"]);
        assert!(cli.no_color);
        assert_eq!(
            cli.command(),
            Commands::Ask {
                question: "¿Hacen domicilios?".to_string(),
                top_k: Some(5),
                json: true,
            }
        );
    }

    #[test]
    fn test_index_overrides() {
        let cli = parse(&[
            "index",
            "--path",
            "./kb",
            "--chunk-size",
            "300",
            "--chunk-overlap",
            "30",
            "--reset",
            "-c",
            "other.toml",
        ]);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert_eq!(
            cli.command(),
            Commands::Index {
                path: Some(PathBuf::from("./kb")),
                chunk_size: Some(300),
                chunk_overlap: Some(30),
                batch_size: None,
                reset: true,
            }
        );
    }

    #[test]
    fn test_reset_and_stats() {
        assert_eq!(parse(&["reset", "--yes"]).command(), Commands::Reset { yes: true });
        assert_eq!(parse(&["stats", "-v"]).command(), Commands::Stats);
        assert!(parse(&["stats", "-v"]).verbose);
    }

    #[test]
    fn test_ask_requires_question() {
        assert!(Cli::try_parse_from(["sabor", "ask"]).is_err());
    }
}
