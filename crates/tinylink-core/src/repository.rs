use crate::error::StorageError;
use crate::link::ShortLink;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Persistent mapping from short code to [`ShortLink`].
///
/// Implementations must make `insert` atomic per code: when several
/// callers race on the same code exactly one succeeds and the rest get
/// [`StorageError::Duplicate`].
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Inserts a new link. Returns `Err(Duplicate)` if the code already exists.
    async fn insert(&self, link: ShortLink) -> Result<()>;

    /// Retrieves the link for a given short code.
    ///
    /// Returns `Err(NotFound)` if the code does not exist. Expired links
    /// are still returned; callers decide what expiry means.
    async fn get(&self, code: &ShortCode) -> Result<ShortLink>;

    /// Checks whether a short code is already taken.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;

    /// Physically removes links that are expired at `now`.
    /// Returns the number of removed links.
    async fn purge_expired(&self, now: Timestamp) -> Result<u64>;
}
