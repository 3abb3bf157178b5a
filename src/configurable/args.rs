use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "configurable")]
#[command(about = "Inspect and edit JSON configuration files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the configuration as it would be written
    Show {
        /// Configuration file
        file: PathBuf,
    },

    /// Print a single property value as JSON
    Get {
        /// Configuration file
        file: PathBuf,

        /// Property name
        name: String,
    },

    /// Set a property and write the file back
    Set {
        /// Configuration file
        file: PathBuf,

        /// Property name
        name: String,

        /// New value, parsed as JSON (bare words are taken as strings)
        value: String,
    },

    /// Remove a property and write the file back
    #[command(alias = "rm")]
    Unset {
        /// Configuration file
        file: PathBuf,

        /// Property name
        name: String,
    },
}
