use crate::extractor::types::{DocxExtractor, HtmlExtractor, PdfExtractor, PlainTextExtractor};
use crate::extractor::{DocumentKind, TextExtractor};

/// Factory for creating TextExtractor instances based on document kind
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Create the extractor for a declared filename
    pub fn for_filename(filename: &str) -> Box<dyn TextExtractor> {
        Self::create(DocumentKind::from_filename(filename))
    }

    /// Create the extractor for a document kind
    pub fn create(kind: DocumentKind) -> Box<dyn TextExtractor> {
        match kind {
            DocumentKind::Pdf => Box::new(PdfExtractor),
            DocumentKind::Docx => Box::new(DocxExtractor),
            DocumentKind::Html => Box::new(HtmlExtractor),
            DocumentKind::PlainText => Box::new(PlainTextExtractor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_pdf() {
        assert_eq!(ExtractorFactory::for_filename("lease.pdf").kind(), DocumentKind::Pdf);
    }

    #[test]
    fn test_factory_docx() {
        assert_eq!(ExtractorFactory::for_filename("lease.docx").kind(), DocumentKind::Docx);
    }

    #[test]
    fn test_factory_html() {
        assert_eq!(ExtractorFactory::for_filename("template.htm").kind(), DocumentKind::Html);
        assert_eq!(ExtractorFactory::for_filename("template.html").kind(), DocumentKind::Html);
    }

    #[test]
    fn test_factory_plain_text() {
        assert_eq!(ExtractorFactory::for_filename("lease.txt").kind(), DocumentKind::PlainText);
        assert_eq!(ExtractorFactory::for_filename("lease").kind(), DocumentKind::PlainText);
    }

    #[test]
    fn test_factory_create_matches_kind() {
        for kind in [
            DocumentKind::Pdf,
            DocumentKind::Docx,
            DocumentKind::Html,
            DocumentKind::PlainText,
        ] {
            assert_eq!(ExtractorFactory::create(kind).kind(), kind);
        }
    }
}
