use crate::error::CoreError;
use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::Serialize;

/// A persisted short link.
///
/// Records are never mutated after creation. `expires_at`, when set, is
/// strictly after `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortLink {
    code: ShortCode,
    target_url: String,
    created_at: Timestamp,
    expires_at: Option<Timestamp>,
}

impl ShortLink {
    pub fn new(
        code: ShortCode,
        target_url: impl Into<String>,
        created_at: Timestamp,
        expires_at: Option<Timestamp>,
    ) -> Result<Self, CoreError> {
        let target_url = target_url.into();
        if target_url.is_empty() {
            return Err(CoreError::InvalidLink("target url cannot be empty".into()));
        }
        if let Some(expires_at) = expires_at {
            if expires_at <= created_at {
                return Err(CoreError::InvalidLink(format!(
                    "expires_at {expires_at} must be after created_at {created_at}"
                )));
            }
        }

        Ok(Self {
            code,
            target_url,
            created_at,
            expires_at,
        })
    }

    pub fn code(&self) -> &ShortCode {
        &self.code
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn expires_at(&self) -> Option<Timestamp> {
        self.expires_at
    }

    /// Whether the link is logically gone at `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    pub fn into_target_url(self) -> String {
        self.target_url
    }
}
