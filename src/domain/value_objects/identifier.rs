use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters escaped when an identifier is placed in a URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode a value for use as one URL path segment
#[must_use]
pub fn encode_path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// One identifier taken from a route path segment (video id, file name, quality, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier(String);

impl Identifier {
    /// Validate an already decoded identifier
    ///
    /// # Errors
    /// Returns an error for empty values, `.`/`..`, path separators and control characters
    pub fn new(value: &str) -> Result<Self, IdentifierError> {
        if value.is_empty() {
            return Err(IdentifierError::Empty);
        }

        if value == "." || value == ".." {
            return Err(IdentifierError::Traversal(value.to_string()));
        }

        if let Some(c) = value.chars().find(|c| matches!(c, '/' | '\\') || c.is_control()) {
            return Err(IdentifierError::ForbiddenCharacter(c));
        }

        Ok(Self(value.to_string()))
    }

    /// Decode a raw (percent-encoded) path segment and validate it
    ///
    /// # Errors
    /// Returns an error if the segment is not UTF-8 once decoded or fails validation
    pub fn from_path_segment(segment: &str) -> Result<Self, IdentifierError> {
        let decoded =
            percent_decode_str(segment).decode_utf8().map_err(|_| IdentifierError::InvalidUtf8)?;
        Self::new(&decoded)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form, safe to use as a single URL path segment
    #[must_use]
    pub fn encoded(&self) -> String {
        encode_path_segment(&self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Errors raised while validating an identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("Identifier is empty")]
    Empty,
    #[error("Identifier is not valid UTF-8")]
    InvalidUtf8,
    #[error("Identifier is a relative path component: {0}")]
    Traversal(String),
    #[error("Identifier contains a forbidden character: {0:?}")]
    ForbiddenCharacter(char),
}
