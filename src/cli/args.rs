//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Build forests from flat JSON records with parent ids, then render, walk or check them
#[derive(Parser, Debug)]
#[command(name = "rsforest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Parent id given to top-level nodes (overrides config)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub root_id: Option<i64>,

    /// Refuse input with duplicate ids (overrides config)
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the forest as a tree
    Tree {
        /// JSON file with an array of records, `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show the forest as nested JSON
    Json {
        /// JSON file with an array of records, `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Walk the forest depth-first, one JSON line per node with seq and parent_id filled in
    Walk {
        /// JSON file with an array of records, `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Stop the walk after visiting this id
        #[arg(long, allow_negative_numbers = true)]
        stop_at: Option<i64>,
    },

    /// List root-to-leaf id paths
    Branches {
        /// JSON file with an array of records, `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Report duplicate ids and nodes caught in parent cycles
    Check {
        /// JSON file with an array of records, `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
    /// Print a config template
    Template,
}
