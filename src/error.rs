use crate::extractor::DocumentKind;
use thiserror::Error;

/// Errors raised while turning an uploaded document into text.
///
/// Only the paginated and paragraph-structured formats can fail; HTML and
/// plain text always degrade to whatever text could be recovered.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to parse {kind} document: {message}")]
    DocumentParse { kind: DocumentKind, message: String },

    #[error("failed to read document stream: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    pub fn parse(kind: DocumentKind, err: impl std::fmt::Display) -> Self {
        ExtractError::DocumentParse {
            kind,
            message: err.to_string(),
        }
    }

    /// Library message of a parse failure, if this is one.
    pub fn parse_message(&self) -> Option<&str> {
        match self {
            ExtractError::DocumentParse { message, .. } => Some(message),
            ExtractError::Io(_) => None,
        }
    }
}

/// Errors raised while writing a DOCX package.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to write document container: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to write document part: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the external text-generation service.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("no API key configured for the text-generation service")]
    MissingApiKey,

    #[error("request to text-generation service failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("text-generation service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid response from text-generation service: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_keeps_library_message() {
        let err = ExtractError::parse(DocumentKind::Pdf, "invalid file header");
        assert_eq!(err.parse_message(), Some("invalid file header"));
        assert_eq!(
            err.to_string(),
            "failed to parse PDF document: invalid file header"
        );
    }

    #[test]
    fn test_io_error_is_not_a_parse_error() {
        let err = ExtractError::from(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "eof",
        ));
        assert!(err.parse_message().is_none());
    }
}
