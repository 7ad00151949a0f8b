use std::time::Duration;
use typed_builder::TypedBuilder;

/// Connection settings for [`SqliteRepository`](crate::SqliteRepository).
///
/// ```
/// use linkstash_storage::SqliteConfig;
///
/// let config = SqliteConfig::builder()
///     .database_url("sqlite://links.db".to_string())
///     .max_connections(2)
///     .build();
/// assert!(config.create_if_missing);
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct SqliteConfig {
    /// SQLite connection string, e.g. `sqlite://links.db?mode=rwc`.
    pub database_url: String,
    #[builder(default = 5)]
    pub max_connections: u32,
    /// How long a statement waits on a locked database before failing.
    #[builder(default = Duration::from_secs(5))]
    pub busy_timeout: Duration,
    #[builder(default = true)]
    pub create_if_missing: bool,
    /// Use the write-ahead log journal so readers don't block the writer.
    #[builder(default = true)]
    pub wal: bool,
}

impl SqliteConfig {
    /// Default settings for the given connection string.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self::builder().database_url(database_url.into()).build()
    }
}
