use crate::{clamp_code_bytes, Generator, DEFAULT_CODE_BYTES};
use rand::RngCore;
use tinylink_core::base58::{ShortCodeBase58, MAX_ENCODED_BYTES};
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct RandomGeneratorSettings {
    /// Number of random bytes per code, clamped to `1..=8`.
    #[builder(default = DEFAULT_CODE_BYTES)]
    code_bytes: usize,
}

/// Draws fresh random bytes for every code and encodes them as base58.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    code_bytes: usize,
}

impl RandomGenerator {
    pub fn new(settings: RandomGeneratorSettings) -> Self {
        Self {
            code_bytes: clamp_code_bytes(settings.code_bytes),
        }
    }

    pub fn code_bytes(&self) -> usize {
        self.code_bytes
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new(RandomGeneratorSettings::builder().build())
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCodeBase58;

    fn generate(&self, _target_url: &str, _attempt: u32) -> Self::Output {
        let mut bytes = [0u8; MAX_ENCODED_BYTES];
        let bytes = &mut bytes[..self.code_bytes];
        rand::thread_rng().fill_bytes(bytes);
        ShortCodeBase58::new(bytes)
    }
}
