use crate::context::Context;
use crate::error::ShortenerError;
use crate::link::Link;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ShortenerError>;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Stores `link` and returns its key.
    ///
    /// Fails with [`ShortenerError::InvalidInput`] for an empty key and with
    /// [`ShortenerError::AlreadyExists`] if the key is already taken.
    async fn shorten(&self, ctx: &Context, link: Link) -> Result<String>;

    /// Looks up the link stored under `key`.
    ///
    /// Fails with [`ShortenerError::NotFound`] if nothing is stored for it.
    async fn resolve(&self, ctx: &Context, key: &str) -> Result<Link>;
}
