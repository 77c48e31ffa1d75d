use crate::{clamp_code_bytes, Generator, DEFAULT_CODE_BYTES};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use tinylink_core::base58::ShortCodeBase58;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct HashGeneratorSettings {
    /// Number of digest bytes per code, clamped to `1..=8`.
    #[builder(default = DEFAULT_CODE_BYTES)]
    code_bytes: usize,
    /// Mixed into every digest so codes differ between deployments.
    #[builder(default, setter(into))]
    salt: String,
}

/// Derives codes from `SHA-256(salt || url || sequence)`.
///
/// `sequence` is a per-generator counter bumped on every call, so repeated
/// requests for one URL keep getting fresh candidates instead of cycling
/// through the same few. Two generators built from the same settings
/// produce the same sequence of codes.
#[derive(Debug)]
pub struct HashGenerator {
    code_bytes: usize,
    salt: String,
    sequence: AtomicU64,
}

impl HashGenerator {
    pub fn new(settings: HashGeneratorSettings) -> Self {
        Self {
            code_bytes: clamp_code_bytes(settings.code_bytes),
            salt: settings.salt,
            sequence: AtomicU64::new(0),
        }
    }
}

impl Default for HashGenerator {
    fn default() -> Self {
        Self::new(HashGeneratorSettings::builder().build())
    }
}

impl Generator for HashGenerator {
    type Output = ShortCodeBase58;

    fn generate(&self, target_url: &str, _attempt: u32) -> Self::Output {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(target_url.as_bytes());
        hasher.update(sequence.to_be_bytes());
        let digest = hasher.finalize();
        ShortCodeBase58::new(&digest[..self.code_bytes])
    }
}
