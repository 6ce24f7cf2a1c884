//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// depot - Contained file storage
#[derive(Parser, Debug)]
#[command(name = "depot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Storage root directory (overrides the config file)
    #[arg(long, global = true, env = "DEPOT_ROOT")]
    pub root: Option<PathBuf>,

    /// Configuration file (.toml, .json, .yaml or .yml)
    #[arg(long, global = true, env = "DEPOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Store a file and print its new identifier
    ///
    /// Examples:
    ///   depot store report.pdf
    ///   cat data.bin | depot store - --name data.bin
    Store {
        /// File to store, or `-` for stdin
        file: PathBuf,

        /// Original name to take the extension from (defaults to FILE's name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Write a stored file to stdout or to a file
    Get {
        /// File identifier
        id: String,

        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check whether a file is stored (exit code 2 if not)
    Exists {
        /// File identifier
        id: String,
    },

    /// Delete a stored file
    Rm {
        /// File identifier
        id: String,

        /// Succeed quietly when the file is already gone
        #[arg(long)]
        if_exists: bool,
    },

    /// Show metadata for a stored file
    Stat {
        /// File identifier
        id: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List stored files
    Ls {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Resolve a request path such as /images/logo.png inside the root
    Resolve {
        /// Request path
        path: String,
    },
}
