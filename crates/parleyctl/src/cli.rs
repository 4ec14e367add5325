//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use parley_shared::Mode;

/// Parley rule-based chat
#[derive(Parser, Debug)]
#[command(name = "parleyctl")]
#[command(about = "Parley - rule-based chat with a safe calculator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Reply mode: normal, faq or joke (overrides the config file)
    #[arg(long, global = true)]
    pub mode: Option<Mode>,

    /// Fixed random seed for reproducible replies
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Path to config file (overrides $PARLEY_CONFIG and the default)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Rule file replacing the built-in tables
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    /// Subcommand (if not provided, starts the chat REPL)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reply to a single message and exit
    Ask {
        /// Message text
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Evaluate an arithmetic expression
    Eval {
        /// Expression, e.g. "2 * (3 + 4) ** 2"
        #[arg(required = true, allow_hyphen_values = true)]
        expression: Vec<String>,
    },

    /// Print the effective rule book as TOML
    Rules,
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
    fn test_parse_ask() {
        let cli = Cli::parse_from(["parleyctl", "--mode", "faq", "ask", "what", "is", "ai"]);
        assert_eq!(cli.mode, Some(Mode::Faq));
        match cli.command {
            Some(Commands::Ask { text }) => assert_eq!(text.join(" "), "what is ai"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_eval_with_leading_minus() {
        let cli = Cli::parse_from(["parleyctl", "eval", "-2", "**", "2"]);
        match cli.command {
            Some(Commands::Eval { expression }) => assert_eq!(expression.join(" "), "-2 ** 2"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_means_repl() {
        let cli = Cli::parse_from(["parleyctl", "--seed", "3"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.seed, Some(3));
    }
}
