use crate::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct SqliteConfig {
    #[builder(default = "links.db".to_string())]
    file_name: String,
    #[builder(default = "linkstash-".to_string())]
    dir_prefix: String,
}

/// Test fixture for a disposable SQLite database file.
///
/// The file lives in a fresh temporary directory that is removed when the
/// fixture is dropped. The database itself is created by whoever first
/// connects with [`SqliteDatabase::database_url`].
pub struct SqliteDatabase {
    dir: TempDir,
    config: SqliteConfig,
}

impl SqliteDatabase {
    pub fn new(config: SqliteConfig) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(config.dir_prefix.as_str())
            .tempdir()?;

        Ok(Self { dir, config })
    }

    /// Path of the database file inside the temporary directory.
    pub fn path(&self) -> PathBuf {
        self.dir.path().join(&self.config.file_name)
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Connection string that creates the file on first use.
    pub fn database_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path().display())
    }
}
