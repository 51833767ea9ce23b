use crate::error::ExtractError;
use crate::extractor::{DocumentKind, TextExtractor};
use lopdf::Document;

/// PDF extractor: one newline-terminated block per page, in page order
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let doc = Document::load_mem(bytes).map_err(|e| ExtractError::parse(self.kind(), e))?;

        let mut text_content = String::new();

        // get_pages is keyed by page number, so iteration is document order
        for page_num in doc.get_pages().keys() {
            let page_text = doc.extract_text(&[*page_num]).map_err(|e| {
                ExtractError::parse(self.kind(), format!("page {}: {}", page_num, e))
            })?;
            // lopdf already ends a page's text with a newline at `ET`
            text_content.push_str(page_text.strip_suffix('\n').unwrap_or(&page_text));
            text_content.push('\n');
        }

        Ok(text_content)
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }
}
