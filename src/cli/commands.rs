//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chronomind")]
#[command(about = "Dated journal with weekly summaries", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new journal
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Where entries live (file, memory)
        #[arg(short, long, default_value = "file")]
        storage: String,
    },

    /// Add an entry
    Add {
        /// Entry text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Entry date (e.g., today, yesterday, last monday, 2024-01-03)
        #[arg(short, long, default_value = "today")]
        date: String,
    },

    /// Dictate an entry through the microphone
    Voice {
        /// Entry date (e.g., today, yesterday, last monday, 2024-01-03)
        #[arg(short, long, default_value = "today")]
        date: String,
    },

    /// Show entries, most recent first
    Timeline {
        /// Show at most this many entries
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Delete an entry by id, or by timeline position
    Delete {
        /// Entry id (e.g., 3 or #3)
        #[arg(required_unless_present = "position", conflicts_with = "position")]
        id: Option<String>,

        /// Timeline position, 0 being the most recent entry
        #[arg(short, long)]
        position: Option<usize>,
    },

    /// Show entries grouped by week
    Weeks,

    /// Summarize each week
    Summaries,

    /// Write weekly summaries to a text file
    Export {
        /// Output file (default: export_file from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive session reading commands from stdin
    Session {
        /// Keep entries in memory only, whatever the configured storage
        #[arg(short, long)]
        ephemeral: bool,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },
}
