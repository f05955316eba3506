use clap::Parser;
use shortlink_cache::entry_cache::DEFAULT_MAX_CAPACITY;
use shortlink_rpc::cli::parse_duration;
use std::net::SocketAddr;
use std::time::Duration;

pub const LISTEN_ADDR_ENV: &str = "SHORTLINK_CACHE_LISTEN_ADDR";
pub const MAX_CAPACITY_ENV: &str = "SHORTLINK_CACHE_MAX_CAPACITY";
pub const TTL_ENV: &str = "SHORTLINK_CACHE_TTL";
pub const SWEEP_INTERVAL_ENV: &str = "SHORTLINK_CACHE_SWEEP_INTERVAL";
pub const LOG_JSON_ENV: &str = "SHORTLINK_LOG_JSON";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5302";

#[derive(Debug, Parser)]
#[command(name = "shortlink-cache")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Maximum number of cached entries.
    #[arg(long, env = MAX_CAPACITY_ENV, default_value_t = DEFAULT_MAX_CAPACITY)]
    pub max_capacity: u64,

    /// Entry time-to-live, e.g. `1m` or `90s`.
    #[arg(long, env = TTL_ENV, default_value = "1m", value_parser = parse_duration)]
    pub ttl: Duration,

    /// Interval of the background purge of expired entries.
    #[arg(long, env = SWEEP_INTERVAL_ENV, default_value = "10s", value_parser = parse_duration)]
    pub sweep_interval: Duration,

    #[arg(long, env = LOG_JSON_ENV)]
    pub log_json: bool,
}
