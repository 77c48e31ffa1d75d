use crate::error::ShortenerError;
use crate::link::ShortLink;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};

type Result<T> = std::result::Result<T, ShortenerError>;

/// Expiration policy for a shortened URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirationPolicy {
    /// The shortened URL never expires.
    Never,
    /// The shortened URL expires after a certain duration from creation.
    AfterDuration(SignedDuration),
}

impl ExpirationPolicy {
    /// Interprets a client supplied lifetime in minutes.
    ///
    /// `0` means the link never expires. Negative values are rejected.
    pub fn from_minutes(minutes: i64) -> Result<Self> {
        match minutes {
            0 => Ok(Self::Never),
            m if m < 0 => Err(ShortenerError::InvalidExpiration(format!(
                "expiration_in_minutes must be >= 0, got {m}"
            ))),
            m => {
                let secs = m.checked_mul(60).ok_or_else(|| {
                    ShortenerError::InvalidExpiration(format!("{m} minutes is out of range"))
                })?;
                Ok(Self::AfterDuration(SignedDuration::from_secs(secs)))
            }
        }
    }

    /// Computes the absolute deadline for a link created at `created_at`.
    pub fn expires_at(&self, created_at: Timestamp) -> Result<Option<Timestamp>> {
        match self {
            Self::Never => Ok(None),
            Self::AfterDuration(duration) => created_at
                .checked_add(*duration)
                .map(Some)
                .map_err(|e| ShortenerError::InvalidExpiration(format!("invalid duration: {e}"))),
        }
    }
}

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone)]
pub struct ShortenParams {
    /// The original URL to be shortened.
    pub original_url: String,
    /// Lifetime of the link in minutes, `0` for no expiration.
    pub expiration_in_minutes: i64,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a shortened URL and returns the persisted link.
    async fn shorten(&self, params: ShortenParams) -> Result<ShortLink>;

    /// Resolves a short code to its target URL.
    ///
    /// Fails with `NotFound` if the code does not exist and `Expired` if it
    /// is past its deadline.
    async fn resolve(&self, code: &ShortCode) -> Result<String>;

    /// Same lookup as [`Shortener::resolve`] but returns the whole record.
    async fn info(&self, code: &ShortCode) -> Result<ShortLink>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_minutes_never_expires() {
        let policy = ExpirationPolicy::from_minutes(0).unwrap();
        assert_eq!(policy, ExpirationPolicy::Never);
        assert_eq!(policy.expires_at(Timestamp::now()).unwrap(), None);
    }

    #[test]
    fn positive_minutes_expire() {
        let created_at = Timestamp::from_second(1_000).unwrap();
        let policy = ExpirationPolicy::from_minutes(2).unwrap();
        assert_eq!(
            policy.expires_at(created_at).unwrap(),
            Some(Timestamp::from_second(1_120).unwrap())
        );
    }

    #[test]
    fn negative_minutes_rejected() {
        let err = ExpirationPolicy::from_minutes(-1).unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidExpiration(_)));
    }

    #[test]
    fn overflowing_minutes_rejected() {
        let err = ExpirationPolicy::from_minutes(i64::MAX).unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidExpiration(_)));

        let policy = ExpirationPolicy::from_minutes(i64::MAX / 60).unwrap();
        assert!(policy.expires_at(Timestamp::now()).is_err());
    }
}
