use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tinylink_core::ShortLink;

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    #[serde(default)]
    pub url: String,
    /// `0` (the default) means the link never expires.
    #[serde(default)]
    pub expiration_in_minutes: i64,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub shortlink: String,
}

#[derive(Debug, Deserialize)]
pub struct InfoQuery {
    pub shortlink: String,
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub shortlink: String,
    pub url: String,
    pub created_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}

impl From<ShortLink> for InfoResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            shortlink: link.code().to_string(),
            created_at: link.created_at(),
            expires_at: link.expires_at(),
            url: link.into_target_url(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
