use crate::error::ExtractError;
use crate::extractor::DocumentKind;

/// Trait for text extractors that turn one document format into plain text
pub trait TextExtractor: Send + Sync {
    /// Extract text content from the raw document bytes
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;

    /// The document kind this extractor handles
    fn kind(&self) -> DocumentKind;
}
