pub mod factory;
pub mod kind;
pub mod r#trait;
pub mod types;

pub use factory::ExtractorFactory;
pub use kind::DocumentKind;
pub use r#trait::TextExtractor;
pub use types::html::{decode_dropping_invalid, html_to_text};
pub use types::{DocxExtractor, HtmlExtractor, PdfExtractor, PlainTextExtractor};

use crate::error::ExtractError;
use std::io::Read;

/// Extract plain text from a document stream.
///
/// The stream is read to completion; `filename` is only used for its suffix.
pub fn extract<R: Read>(mut reader: R, filename: &str) -> Result<String, ExtractError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    extract_bytes(&bytes, filename)
}

/// Extract plain text from an in-memory document
pub fn extract_bytes(bytes: &[u8], filename: &str) -> Result<String, ExtractError> {
    let extractor = ExtractorFactory::for_filename(filename);
    tracing::debug!(
        filename,
        kind = %extractor.kind(),
        can_fail = extractor.kind().can_fail(),
        bytes = bytes.len(),
        "Extracting document text"
    );
    extractor.extract(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_extract_dispatches_html() {
        let html = b"<html><body><h1>Lease</h1><p>Tenant: Acme</p></body></html>";
        let text = extract(Cursor::new(&html[..]), "lease.html").unwrap();
        assert_eq!(text, "Lease\nTenant: Acme");
    }

    #[test]
    fn test_extract_dispatches_plain_text() {
        let text = extract(Cursor::new(b"Base Rent: $10\n".to_vec()), "lease.txt").unwrap();
        assert_eq!(text, "Base Rent: $10\n");
    }

    #[test]
    fn test_uppercase_suffix_is_plain_text() {
        // markup is kept verbatim because `.HTML` is not an HTML suffix
        let text = extract_bytes(b"<p>Hi</p>", "LEASE.HTML").unwrap();
        assert_eq!(text, "<p>Hi</p>");
    }

    #[test]
    fn test_extract_pdf_one_block_per_page() {
        let pages = ["Page one", "Page two", "Page three", "Page four"];
        let bytes = types::pdf::tests::build_pdf(&pages);
        let text = extract(Cursor::new(bytes), "lease.pdf").unwrap();

        assert_eq!(text, "Page one\nPage two\nPage three\nPage four\n");
    }

    #[test]
    fn test_malformed_pdf_is_parse_error() {
        let err = extract_bytes(b"not a pdf at all", "lease.pdf").unwrap_err();
        match err {
            ExtractError::DocumentParse { kind, .. } => assert_eq!(kind, DocumentKind::Pdf),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_docx_is_parse_error() {
        let err = extract_bytes(b"PK\x03\x04garbage", "lease.docx").unwrap_err();
        assert!(err.parse_message().is_some());
    }

    #[test]
    fn test_only_fallible_kinds_reject_garbage() {
        for filename in ["x.pdf", "x.docx", "x.html", "x.txt"] {
            let kind = DocumentKind::from_filename(filename);
            let result = extract_bytes(b"\x00\xffgarbage<", filename);
            assert_eq!(result.is_err(), kind.can_fail(), "{}", filename);
        }
    }

    #[test]
    fn test_empty_stream() {
        assert_eq!(extract(Cursor::new(Vec::new()), "empty.txt").unwrap(), "");
        assert_eq!(extract(Cursor::new(Vec::new()), "empty.html").unwrap(), "");
    }
}
