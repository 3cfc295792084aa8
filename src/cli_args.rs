use clap::{ArgAction, Parser, Subcommand};

use crate::config::ProviderKind;

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "synapse",
    version,
    about = "Plain-language commit summaries and answers about your Git history"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Text-generation backend to use
    #[arg(long, value_enum, global = true)]
    pub provider: Option<ProviderKind>,

    /// Model name to use (e.g. gpt-4o-mini). If 'none', acts like --no-model.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// API key (otherwise uses OPENAI_API_KEY env var)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Base URL of the provider API
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// HTTP timeout for provider calls, in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Disable model calls; every result comes from the built-in fallback rules
    #[arg(long, global = true)]
    pub no_model: bool,

    /// Print results as JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize a commit from the local repository, or one described on the command line
    Summarize {
        /// Revision to summarize (defaults to HEAD)
        #[arg(conflicts_with = "message")]
        rev: Option<String>,

        /// Commit message to summarize instead of reading one from git
        #[arg(long)]
        message: Option<String>,

        /// Changed file (repeatable); only used with --message
        #[arg(long = "file", requires = "message")]
        files: Vec<String>,

        /// Diff text; only used with --message
        #[arg(long, requires = "message")]
        diff: Option<String>,

        /// Commit hash to report; only used with --message
        #[arg(long, requires = "message")]
        sha: Option<String>,
    },

    /// Ask a question about recent commits
    Ask {
        /// The question to answer
        question: String,

        /// Answer about this revision only
        #[arg(long, conflicts_with = "stdin")]
        rev: Option<String>,

        /// Read a JSON array of commits from stdin instead of git
        #[arg(long)]
        stdin: bool,

        /// How many recent commits to load from git when no revision is given
        #[arg(long, default_value_t = 5)]
        recent: usize,
    },
}
