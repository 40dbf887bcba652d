//! Command-line argument parsing for surgassist
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// surgassist - Browse and query a surgical complication knowledge base
#[derive(Parser, Debug)]
#[command(name = "surgassist")]
#[command(version)]
#[command(about = "Surgical complication assistant: browse protocols or ask grounded questions", long_about = None)]
pub struct Args {
    /// Knowledge base JSON file (overrides config)
    #[arg(long, value_name = "FILE")]
    pub kb: Option<PathBuf>,

    /// Completion model (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress diagnostics except errors)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand (interactive session when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start interactive session
    Start,

    /// List every surgery with its category and complications
    Summary,

    /// Find a protocol by surgery or complication keyword
    Search {
        /// Keyword, e.g. "leak" or "cholecystectomy"
        query: String,
    },

    /// List surgery names
    Surgeries,

    /// List complications of a surgery
    Complications {
        /// Exact surgery name
        surgery: String,
    },

    /// Show the protocol for an exact surgery and complication
    Show {
        /// Exact surgery name
        surgery: String,
        /// Exact complication name
        complication: String,
    },

    /// Ask a clinical question answered from the knowledge base
    Ask {
        /// Free-text question
        question: String,
    },

    /// Run configuration and connectivity checks
    Doctor,

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Subcommand, defaulting to the interactive session
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}

impl Verbosity {
    /// Check if should show progress spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show retrieved sources
    pub fn show_sources(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("surgassist").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_is_start() {
        let args = parse(&[]);
        assert_eq!(args.command(), Commands::Start);
        assert_eq!(args.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["-q"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["-v"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["-vv"]).verbosity(), Verbosity::VeryVerbose);
    }

    #[test]
    fn test_search_command() {
        let args = parse(&["search", "bile duct"]);
        assert_eq!(
            args.command(),
            Commands::Search {
                query: "bile duct".to_string()
            }
        );
    }

    #[test]
    fn test_show_command_with_overrides() {
        let args = parse(&["--kb", "kb.json", "-m", "gemini-test", "show", "Colectomy", "Bleeding"]);
        assert_eq!(args.kb, Some(PathBuf::from("kb.json")));
        assert_eq!(args.model.as_deref(), Some("gemini-test"));
        assert_eq!(
            args.command(),
            Commands::Show {
                surgery: "Colectomy".to_string(),
                complication: "Bleeding".to_string()
            }
        );
    }

    #[test]
    fn test_ask_command() {
        assert_eq!(
            parse(&["ask", "what causes a leak?"]).command(),
            Commands::Ask {
                question: "what causes a leak?".to_string()
            }
        );
        assert_eq!(parse(&["summary"]).command(), Commands::Summary);
    }

    #[test]
    fn test_verbosity_methods() {
        assert!(!Verbosity::Quiet.show_progress());
        assert!(Verbosity::Normal.show_progress());
        assert!(!Verbosity::Normal.show_sources());
        assert!(Verbosity::Verbose.show_sources());
    }
}
