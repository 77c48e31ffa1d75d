//! Core types and traits for the tinylink URL shortener.
//!
//! This crate provides the shared vocabulary used by the generator,
//! storage, shortener and gateway crates: short codes, link records,
//! the clock abstraction and the error taxonomy.

pub mod base58;
pub mod clock;
pub mod error;
pub mod link;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, ShortenerError, StorageError};
pub use link::ShortLink;
pub use repository::Repository;
pub use shortcode::ShortCode;
pub use shortener::{ExpirationPolicy, ShortenParams, Shortener};
