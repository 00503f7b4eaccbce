//! # Error Types
//!
//! This module defines error types used throughout the pavers library.
//!
//! Two families exist:
//!
//! - [`PaversError`]: operational failures (I/O, configuration, server).
//! - [`Rejection`]: a submission the buyer must correct. These carry the
//!   1-based line number where one applies and render as actionable messages.
//!
//! A product without a rule is neither: it is an ordinary `None`.

use thiserror::Error;

/// Main error type for pavers operations
#[derive(Debug, Error)]
pub enum PaversError {
    /// Rule table or server configuration is malformed
    #[error("Config error: {0}")]
    Config(String),

    /// Server start-up or runtime failure
    #[error("Server error: {0}")]
    Server(String),

    /// Graphic storage failure
    #[error("Upload error: {0}")]
    Upload(String),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reason a personalization submission was refused.
///
/// Line indices are 1-based, matching what the buyer sees on the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Line {0} is empty. Every line of this paver must be filled in.")]
    EmptyLine(usize),

    #[error("Line {index} is too long. Use at most {max} characters.")]
    LineTooLong { index: usize, max: usize },

    #[error(
        "Line {0} contains a character that cannot be engraved. Use letters, digits, spaces and . , - _ ' \" / \\ & ( ) : ; ! ? + # @ * $ % ="
    )]
    DisallowedCharacter(usize),

    #[error("The form has expired. Reload the page and try again.")]
    MissingConsentToken,

    #[error("The graphic is too large. The maximum size is {max_bytes} bytes.")]
    UploadTooLarge { max_bytes: usize },

    #[error("The graphic must be a PNG, JPEG, GIF or SVG image (got {0}).")]
    UploadWrongType(String),

    #[error("The graphic could not be uploaded: {0}")]
    UploadFailed(String),
}

impl Rejection {
    /// Line the rejection refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Rejection::EmptyLine(index) | Rejection::DisallowedCharacter(index) => Some(*index),
            Rejection::LineTooLong { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// True for the three upload-related rejections.
    pub fn is_upload(&self) -> bool {
        matches!(
            self,
            Rejection::UploadTooLarge { .. }
                | Rejection::UploadWrongType(_)
                | Rejection::UploadFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_messages_name_the_line() {
        assert_eq!(
            Rejection::LineTooLong { index: 2, max: 15 }.to_string(),
            "Line 2 is too long. Use at most 15 characters."
        );
        assert!(Rejection::EmptyLine(3).to_string().starts_with("Line 3 "));
        assert_eq!(Rejection::DisallowedCharacter(1).line(), Some(1));
    }

    #[test]
    fn test_non_line_rejections() {
        assert_eq!(Rejection::MissingConsentToken.line(), None);
        assert!(Rejection::UploadFailed("disk full".into()).is_upload());
        assert!(!Rejection::EmptyLine(1).is_upload());
    }
}
