//! Opaque page cursors.
//!
//! Cursors are URL-safe base64 encodings of a JSON page window. Callers treat
//! them as opaque strings; only this module knows the layout.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::error::PaginationError;
use crate::page::PageRequest;

/// An opaque token identifying a page window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Encode a page request into a cursor token.
    #[must_use]
    pub fn encode(request: &PageRequest) -> Self {
        // Two integers always serialise.
        let json = serde_json::to_vec(request).unwrap_or_default();
        Self(URL_SAFE_NO_PAD.encode(json))
    }

    /// Accept a caller-supplied token.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidCursor`] when the token is blank.
    pub fn parse(token: &str) -> Result<Self, PaginationError> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(PaginationError::invalid_cursor("cursor must not be empty"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Decode the page window carried by this cursor.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidCursor`] when the token is not valid
    /// base64 or JSON, or when the embedded window is out of range.
    pub fn decode(&self) -> Result<PageRequest, PaginationError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(self.0.as_bytes())
            .map_err(|err| PaginationError::invalid_cursor(err.to_string()))?;
        serde_json::from_slice::<PageRequest>(&bytes)
            .map_err(|err| PaginationError::invalid_cursor(err.to_string()))
    }

    /// Borrow the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
