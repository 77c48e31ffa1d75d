use async_trait::async_trait;
use jiff::Timestamp;
use std::sync::Arc;
use tinylink_core::{
    Clock, ExpirationPolicy, Repository, ShortCode, ShortLink, ShortenParams, Shortener,
    ShortenerError, StorageError, SystemClock,
};
use tinylink_generator::Generator;
use tracing::{debug, info, trace, warn};
use url::Url;

/// Number of codes tried before giving up on a creation request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository`, a `Generator` and a `Clock` to handle:
/// - URL and expiration validation
/// - Short code generation with bounded collision retry
/// - Expiry checks on lookup
///
/// The service keeps no state of its own between requests; every call
/// goes through the repository.
#[derive(Debug, Clone)]
pub struct ShortenerService<R, G, C = SystemClock> {
    repository: Arc<R>,
    generator: Arc<G>,
    clock: Arc<C>,
    max_attempts: u32,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService` reading time from the system clock.
    pub fn new(repository: R, generator: G) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            clock: Arc::new(SystemClock),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl<R: Repository, G: Generator, C: Clock> ShortenerService<R, G, C> {
    /// Replaces the clock used for creation times and expiry checks.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> ShortenerService<R, G, C2> {
        ShortenerService {
            repository: self.repository,
            generator: self.generator,
            clock: Arc::new(clock),
            max_attempts: self.max_attempts,
        }
    }

    /// Sets the collision retry budget. At least one attempt is always made.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Returns the shared repository handle.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Validates that the URL is absolute http(s) with a host.
    ///
    /// The caller's string is stored as-is, so anything that would not
    /// survive a `Location` header is rejected here.
    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        if url.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ShortenerError::InvalidUrl(
                "URL must not contain whitespace or control characters".to_string(),
            ));
        }

        let parsed = Url::parse(url)
            .map_err(|e| ShortenerError::InvalidUrl(format!("{e}: {url}")))?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                scheme
            )));
        }

        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a host: {}",
                url
            )));
        }

        Ok(())
    }

    /// Fetches a live link, classifying absent and expired codes.
    async fn lookup(&self, code: &ShortCode) -> Result<ShortLink, ShortenerError> {
        let link = match self.repository.get(code).await {
            Ok(link) => link,
            Err(StorageError::NotFound(_)) => {
                trace!(code = %code, "short code not found");
                return Err(ShortenerError::NotFound(code.to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        if link.is_expired_at(self.clock.now()) {
            debug!(code = %code, expires_at = ?link.expires_at(), "short link has expired");
            return Err(ShortenerError::Expired(code.to_string()));
        }

        Ok(link)
    }
}

/// Drops sub-millisecond precision, which persistent stores do not keep.
fn whole_milliseconds(ts: Timestamp) -> Timestamp {
    Timestamp::from_millisecond(ts.as_millisecond()).unwrap_or(ts)
}

#[async_trait]
impl<R: Repository, G: Generator, C: Clock> Shortener for ShortenerService<R, G, C> {
    async fn shorten(&self, params: ShortenParams) -> Result<ShortLink, ShortenerError> {
        Self::validate_url(&params.original_url)?;
        let expiration = ExpirationPolicy::from_minutes(params.expiration_in_minutes)?;

        let created_at = whole_milliseconds(self.clock.now());
        let expires_at = expiration.expires_at(created_at)?;

        for attempt in 0..self.max_attempts {
            let code: ShortCode = self
                .generator
                .generate(&params.original_url, attempt)
                .into();

            if self.repository.exists(&code).await? {
                debug!(code = %code, attempt, "generated code is taken, retrying");
                continue;
            }

            let link = ShortLink::new(code, params.original_url.clone(), created_at, expires_at)?;

            // another request may have claimed the code since the exists check
            match self.repository.insert(link.clone()).await {
                Ok(()) => {
                    info!(
                        code = %link.code(),
                        url = %link.target_url(),
                        expires_at = ?link.expires_at(),
                        attempt,
                        "created short link"
                    );
                    return Ok(link);
                }
                Err(StorageError::Duplicate(code)) => {
                    debug!(code = %code, attempt, "lost insert race, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(
            url = %params.original_url,
            attempts = self.max_attempts,
            "could not find a free short code"
        );
        Err(ShortenerError::GenerationExhausted {
            attempts: self.max_attempts,
        })
    }

    async fn resolve(&self, code: &ShortCode) -> Result<String, ShortenerError> {
        let link = self.lookup(code).await?;
        debug!(code = %code, url = %link.target_url(), "resolved short code");
        Ok(link.into_target_url())
    }

    async fn info(&self, code: &ShortCode) -> Result<ShortLink, ShortenerError> {
        self.lookup(code).await
    }
}
