use crate::base58::ShortCodeBase58;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// A validated short code identifier for a shortened URL.
///
/// Short codes are 1-11 characters long and contain only ASCII letters
/// and digits, so they can be used directly as a path segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ShortCode(SmolStr);

pub const MIN_LENGTH: usize = 1;
pub const MAX_LENGTH: usize = 11;

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    pub fn new(code: impl AsRef<str>) -> Result<Self, CoreError> {
        let code = code.as_ref();
        Self::validate(code)?;
        Ok(Self(SmolStr::new(code)))
    }

    /// Creates a `ShortCode` from a generated base58 value.
    ///
    /// # Examples
    ///
    /// ```
    /// use tinylink_core::base58::ShortCodeBase58;
    /// use tinylink_core::ShortCode;
    ///
    /// let code = ShortCode::generated(ShortCodeBase58::new([1, 2, 3, 4, 5]));
    /// assert!(code.as_str().len() <= 11);
    /// ```
    pub fn generated(code: impl Into<ShortCodeBase58>) -> Self {
        Self(SmolStr::new(code.into().as_str()))
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> Result<(), CoreError> {
        if code.len() < MIN_LENGTH || code.len() > MAX_LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                code.len()
            )));
        }

        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only ASCII letters and digits: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl From<ShortCodeBase58> for ShortCode {
    fn from(value: ShortCodeBase58) -> Self {
        Self::generated(value)
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ShortCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = SmolStr::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}
