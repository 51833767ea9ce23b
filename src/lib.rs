pub mod config;
pub mod converter;
pub mod error;
pub mod extractor;
pub mod llm;
pub mod prompt;
pub mod template;
pub mod term_sheet;
pub mod utils;

pub use converter::text_to_docx;
pub use error::{ConvertError, ExtractError, GeneratorError};
pub use extractor::{extract, extract_bytes, DocumentKind, TextExtractor};
pub use llm::{GenerationParams, TextGenerator};
pub use template::{load_default_template, Template};
pub use term_sheet::{TermSheetOutcome, TermSheetService};
