use clap::{Parser, Subcommand, ValueEnum};
use shortlink_core::WritePolicy;
use shortlink_rpc::cli::parse_duration;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const BACKENDS_ENV: &str = "SHORTLINK_BACKENDS";
pub const WRITE_POLICY_ENV: &str = "SHORTLINK_WRITE_POLICY";
pub const TIMEOUT_ENV: &str = "SHORTLINK_TIMEOUT";
pub const LOG_JSON_ENV: &str = "SHORTLINK_LOG_JSON";

/// Cache first, then the durable store.
pub const DEFAULT_BACKENDS: &str = "http://127.0.0.1:5302,http://127.0.0.1:5300";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WritePolicyArg {
    #[value(name = "first-success")]
    FirstSuccess,
    #[value(name = "all")]
    All,
}

impl Display for WritePolicyArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WritePolicyArg::FirstSuccess => write!(f, "first-success"),
            WritePolicyArg::All => write!(f, "all"),
        }
    }
}

impl From<WritePolicyArg> for WritePolicy {
    fn from(arg: WritePolicyArg) -> Self {
        match arg {
            WritePolicyArg::FirstSuccess => WritePolicy::FirstSuccess,
            WritePolicyArg::All => WritePolicy::All,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "shortlink")]
pub struct CLI {
    /// Storage backends in priority order. Repeat the flag or pass a
    /// comma separated list.
    #[arg(
        long = "backend",
        env = BACKENDS_ENV,
        value_delimiter = ',',
        default_value = DEFAULT_BACKENDS,
    )]
    pub backends: Vec<String>,

    #[arg(
        long,
        env = WRITE_POLICY_ENV,
        value_enum,
        default_value_t = WritePolicyArg::FirstSuccess
    )]
    pub write_policy: WritePolicyArg,

    /// Dial every backend before running the command.
    #[arg(long)]
    pub eager: bool,

    /// Deadline of each request to a backend, e.g. `2s`.
    #[arg(long, env = TIMEOUT_ENV, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    #[arg(long, env = LOG_JSON_ENV)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a URL and print its hash.
    Put { url: String },
    /// Print the URL stored under a hash.
    Get { hash: String },
    /// Print the hash of a URL without storing it.
    Hash { url: String },
}
