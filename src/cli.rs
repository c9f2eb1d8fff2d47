use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Language to translate from (overrides the configured session)
    #[arg(short, long)]
    pub from: Option<String>,

    /// Language to translate to (overrides the configured session)
    #[arg(short, long)]
    pub to: Option<String>,

    /// Resolve pronunciation audio URLs
    #[arg(long)]
    pub audio: bool,

    /// Keep lookups in memory only, never touching the cache directory
    #[arg(long)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up one or more words and exit
    Lookup {
        /// Words to look up
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Start the interactive prompt (default when no command is given)
    Repl,

    /// List supported languages
    Locales,

    /// Manage the lookup cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// List cached language pairs and their entry counts
    List,

    /// Show cache statistics and size
    Info,

    /// Clear cached lookups
    Clear {
        /// Only clear this language pair (e.g. "en-es")
        #[arg(short, long)]
        pair: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write the default configuration to a file
    Init {
        /// Output file
        #[arg(short, long, default_value = "glosa.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
