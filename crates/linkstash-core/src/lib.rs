//! Core types and traits for the linkstash URL shortener.
//!
//! This crate provides the shared types used by the storage backends and
//! the shortener service: the [`Link`] entity, the cancellation [`Context`],
//! the error taxonomy and the repository/service traits.

pub mod context;
pub mod error;
pub mod link;
pub mod repository;
pub mod shortener;

pub use context::{CancelHandle, Context};
pub use error::{ContextError, ShortenerError, StorageError};
pub use link::Link;
pub use repository::{ReadRepository, Repository};
pub use shortener::Shortener;
