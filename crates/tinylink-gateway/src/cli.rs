use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "TINYLINK_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "TINYLINK_STORAGE_BACKEND";
pub const SQLITE_URL_ENV: &str = "TINYLINK_SQLITE_URL";
pub const GENERATOR_ENV: &str = "TINYLINK_GENERATOR";
pub const CODE_BYTES_ENV: &str = "TINYLINK_CODE_BYTES";
pub const HASH_SALT_ENV: &str = "TINYLINK_HASH_SALT";
pub const MAX_ATTEMPTS_ENV: &str = "TINYLINK_MAX_ATTEMPTS";
pub const PURGE_INTERVAL_ENV: &str = "TINYLINK_PURGE_INTERVAL_SECS";
pub const LOG_FORMAT_ENV: &str = "TINYLINK_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "sqlite")]
    Sqlite,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeneratorArg {
    Random,
    Hash,
}

impl Display for GeneratorArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorArg::Random => write!(f, "random"),
            GeneratorArg::Hash => write!(f, "hash"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "tinylink", about = "URL shortener HTTP gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    /// e.g. `sqlite://tinylink.db`
    #[arg(long, env = SQLITE_URL_ENV, required_if_eq("storage", "sqlite"))]
    pub sqlite_url: Option<String>,

    #[arg(long, env = GENERATOR_ENV, value_enum, default_value_t = GeneratorArg::Random)]
    pub generator: GeneratorArg,

    /// Bytes of entropy per code; 8 bytes is the 11 character maximum.
    #[arg(
        long,
        env = CODE_BYTES_ENV,
        default_value_t = 5,
        value_parser = clap::value_parser!(u8).range(1..=8)
    )]
    pub code_bytes: u8,

    #[arg(long, env = HASH_SALT_ENV, default_value = "")]
    pub hash_salt: String,

    /// Codes tried per request before giving up.
    #[arg(
        long,
        env = MAX_ATTEMPTS_ENV,
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_attempts: u32,

    /// Seconds between sweeps of expired links, 0 disables the sweep.
    #[arg(long, env = PURGE_INTERVAL_ENV, default_value_t = 0)]
    pub purge_interval_secs: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,
}
