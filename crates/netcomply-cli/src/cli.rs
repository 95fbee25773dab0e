use clap::{Parser, Subcommand};
use netcomply_core::RuleId;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "netcomply")]
#[command(author, version, about = "Author network compliance rules", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "netcomply.yaml")]
    pub config: PathBuf,

    /// Rules API base URL (overrides the configuration file)
    #[arg(short, long, env = "NETCOMPLY_API_URL")]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List rules stored on the server
    List,

    /// Check a rule bundle without contacting the server
    Validate {
        /// YAML rule bundle
        bundle: PathBuf,
    },

    /// Create or update every rule in a bundle
    Apply {
        /// YAML rule bundle
        bundle: PathBuf,

        /// Apply against a local copy of the server's rules instead
        #[arg(long)]
        dry_run: bool,
    },

    /// Enable a disabled rule or disable an enabled one
    Toggle {
        /// Rule id
        id: RuleId,
    },

    /// Delete a rule
    Delete {
        /// Rule id
        id: RuleId,
    },
}
