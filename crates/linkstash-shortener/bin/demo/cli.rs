use clap::{Parser, ValueEnum};
use linkstash_telemetry::LogFormat;
use std::fmt::{Display, Formatter};

pub const DATABASE_URL_ENV: &str = "LINKSTASH_DATABASE_URL";
pub const MAX_CONNECTIONS_ENV: &str = "LINKSTASH_MAX_CONNECTIONS";
pub const DEMO_KEY_ENV: &str = "LINKSTASH_DEMO_KEY";
pub const DEMO_URL_ENV: &str = "LINKSTASH_DEMO_URL";
pub const TIMEOUT_MS_ENV: &str = "LINKSTASH_TIMEOUT_MS";
pub const LOG_FORMAT_ENV: &str = "LINKSTASH_LOG_FORMAT";

pub const DEFAULT_DATABASE_URL: &str = "sqlite://links.db?mode=rwc";
pub const DEFAULT_MAX_CONNECTIONS: &str = "5";
pub const DEFAULT_KEY: &str = "foo";
pub const DEFAULT_URL: &str = "https://golang.org";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Text => write!(f, "text"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "linkstash-demo", about = "Shortens one link and resolves it back")]
pub struct CLI {
    #[arg(long, env = DATABASE_URL_ENV, default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    #[arg(long, env = MAX_CONNECTIONS_ENV, default_value = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    #[arg(long, env = DEMO_KEY_ENV, default_value = DEFAULT_KEY)]
    pub key: String,

    #[arg(long, env = DEMO_URL_ENV, default_value = DEFAULT_URL)]
    pub url: String,

    /// Deadline for each store operation, in milliseconds.
    ///
    /// Shorten and resolve each get the full budget.
    #[arg(long, env = TIMEOUT_MS_ENV)]
    pub timeout_ms: Option<u64>,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,
}
