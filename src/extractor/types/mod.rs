pub mod docx;
pub mod html;
pub mod pdf;
pub mod plain;

pub use docx::DocxExtractor;
pub use html::HtmlExtractor;
pub use pdf::PdfExtractor;
pub use plain::PlainTextExtractor;
