//! Credential for the barcode lookup service.

use std::fmt;

use crate::error::{FridgeError, ValidationError};

/// API key for the external barcode database.
///
/// Never blank. The [`Debug`] impl redacts the value so keys do not end up
/// in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a user-supplied key, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`FridgeError::Validation`] when the key is empty after
    /// trimming.
    pub fn new(value: impl AsRef<str>) -> Result<Self, FridgeError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::BlankApiKey.into());
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The raw key, for building request URLs and persisting.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
