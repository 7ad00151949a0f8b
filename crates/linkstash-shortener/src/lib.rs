//! URL shortener service implementation.
//!
//! This crate provides [`ShortenerService`], the facade that turns the
//! shorten/resolve operations into repository calls. Core types are
//! re-exported from `linkstash_core`.

pub mod service;

pub use linkstash_core::{CancelHandle, Context, Link, Shortener, ShortenerError};
pub use service::ShortenerService;
