//! URL shortener service implementation.
//!
//! This crate provides [`ShortenerService`], the implementation of the
//! [`Shortener`] trait. Core types are re-exported from `tinylink_core`.

pub mod service;

pub use service::{ShortenerService, DEFAULT_MAX_ATTEMPTS};
pub use tinylink_core::{ExpirationPolicy, ShortenParams, Shortener, ShortenerError};
