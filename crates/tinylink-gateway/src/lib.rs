//! HTTP gateway for the tinylink URL shortener.
//!
//! Translates `POST /api/shorten`, `GET /api/info` and `GET /{code}` into
//! [`Shortener`][tinylink_core::Shortener] calls and maps the outcome to a
//! status code.

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use state::AppState;
