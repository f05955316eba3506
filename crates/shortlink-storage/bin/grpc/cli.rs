use clap::Parser;
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "SHORTLINK_STORAGE_LISTEN_ADDR";
pub const MYSQL_DSN_ENV: &str = "SHORTLINK_STORAGE_MYSQL_DSN";
pub const NAMESPACE_ENV: &str = "SHORTLINK_STORAGE_NAMESPACE";
pub const MAX_ATTEMPTS_ENV: &str = "SHORTLINK_STORAGE_MAX_ATTEMPTS";
pub const LOG_JSON_ENV: &str = "SHORTLINK_LOG_JSON";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5300";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Parser)]
#[command(name = "shortlink-storage")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(long, env = MYSQL_DSN_ENV)]
    pub mysql_dsn: String,

    /// MySQL schema holding the `urls` table. Defaults to the DSN's database.
    #[arg(long, env = NAMESPACE_ENV)]
    pub namespace: Option<String>,

    /// Attempts per operation, including the first one.
    #[arg(long, env = MAX_ATTEMPTS_ENV, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    #[arg(long, env = LOG_JSON_ENV)]
    pub log_json: bool,
}
