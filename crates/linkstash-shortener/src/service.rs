use async_trait::async_trait;
use linkstash_core::{Context, Link, Repository, Shortener, ShortenerError};
use std::sync::Arc;
use tracing::debug;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and turns each call into a single store
/// round-trip raced against the caller's [`Context`]. Keys are taken as given:
/// no key is generated, no URL is validated and nothing is retried.
#[derive(Debug)]
pub struct ShortenerService<R> {
    repository: Arc<R>,
}

impl<R> Clone for ShortenerService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: Repository> ShortenerService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_shared(Arc::new(repository))
    }

    /// Creates a service over a repository that other consumers also hold.
    pub fn from_shared(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

#[async_trait]
impl<R: Repository> Shortener for ShortenerService<R> {
    async fn shorten(&self, ctx: &Context, link: Link) -> Result<String, ShortenerError> {
        if link.key.is_empty() {
            return Err(ShortenerError::InvalidInput("key is empty".to_string()));
        }

        debug!(key = %link.key, "shortening link");
        ctx.run(self.repository.insert(&link)).await??;
        debug!(key = %link.key, "link stored");

        Ok(link.key)
    }

    async fn resolve(&self, ctx: &Context, key: &str) -> Result<Link, ShortenerError> {
        debug!(key = %key, "resolving link");

        match ctx.run(self.repository.get(key)).await?? {
            Some(url) => Ok(Link::new(key, url)),
            None => Err(ShortenerError::NotFound(key.to_string())),
        }
    }
}
