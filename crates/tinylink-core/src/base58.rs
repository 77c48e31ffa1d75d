use smol_str::SmolStr;
use std::fmt::Display;

/// The largest number of bytes that can be encoded into a short code.
///
/// Eight bytes encode to at most 11 base58 characters, which is the
/// upper bound on a [`ShortCode`][crate::ShortCode].
pub const MAX_ENCODED_BYTES: usize = 8;

/// A short code encoded as base58 string.
///
/// The base58 alphabet only contains ASCII letters and digits, so every
/// non-empty value is a valid short code.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ShortCodeBase58(SmolStr);

impl ShortCodeBase58 {
    /// Creates a new `ShortCodeBase58` by encoding the given bytes as base58.
    ///
    /// Only the first [`MAX_ENCODED_BYTES`] bytes are encoded. An empty
    /// input is padded to a single zero byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use tinylink_core::base58::ShortCodeBase58;
    ///
    /// let code = ShortCodeBase58::new([0x10, 0x20, 0x30]);
    /// assert!(code.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    /// ```
    pub fn new<T: AsRef<[u8]>>(bytes: T) -> Self {
        let bytes = bytes.as_ref();
        let bytes = &bytes[..bytes.len().min(MAX_ENCODED_BYTES)];
        let encoded = if bytes.is_empty() {
            bs58::encode([0u8]).into_string()
        } else {
            bs58::encode(bytes).into_string()
        };
        Self(SmolStr::new(encoded))
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ShortCodeBase58 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortCodeBase58").field(&self.0).finish()
    }
}

impl Display for ShortCodeBase58 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
