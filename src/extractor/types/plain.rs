use crate::error::ExtractError;
use crate::extractor::{DocumentKind, TextExtractor};

/// Raw text fallback for any unrecognised suffix
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        // Invalid sequences become U+FFFD instead of failing the upload
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::PlainText
    }
}
