//! Short code generators.
//!
//! Generators are pure: they never look at storage. The shortener service
//! checks each candidate against the repository and asks for another one,
//! with a higher `attempt`, when it collides.

pub mod hash;
pub mod random;

pub use hash::{HashGenerator, HashGeneratorSettings};
pub use random::{RandomGenerator, RandomGeneratorSettings};

use tinylink_core::base58::MAX_ENCODED_BYTES;
use tinylink_core::ShortCode;

/// Default number of bytes behind a generated code (at most 7 characters).
pub const DEFAULT_CODE_BYTES: usize = 5;

/// Trait for generating short codes.
///
/// Implementations can vary from simple random generators to
/// deterministic digests of the target URL.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Produces a candidate code for `target_url`.
    ///
    /// `attempt` starts at zero and increases on every collision, so a
    /// deterministic generator must yield a different code for each one.
    fn generate(&self, target_url: &str, attempt: u32) -> Self::Output;
}

/// Keeps the byte width inside what a short code can hold.
pub(crate) fn clamp_code_bytes(code_bytes: usize) -> usize {
    code_bytes.clamp(1, MAX_ENCODED_BYTES)
}
