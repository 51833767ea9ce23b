use crate::error::ExtractError;
use crate::extractor::{DocumentKind, TextExtractor};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Main document part inside a WordprocessingML package
pub const DOCUMENT_PART: &str = "word/document.xml";

const BODY_PATH: &[&[u8]] = &[b"w:document", b"w:body"];
const RUN_PATH: &[&[u8]] = &[b"w:document", b"w:body", b"w:p", b"w:r"];
const HYPERLINK_RUN_PATH: &[&[u8]] = &[b"w:document", b"w:body", b"w:p", b"w:hyperlink", b"w:r"];

/// DOCX extractor: one newline-terminated line per body paragraph
pub struct DocxExtractor;

impl DocxExtractor {
    fn read_document_part(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let mut archive =
            ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::parse(self.kind(), e))?;
        let mut part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| ExtractError::parse(self.kind(), format!("{}: {}", DOCUMENT_PART, e)))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|e| ExtractError::parse(self.kind(), format!("{}: {}", DOCUMENT_PART, e)))?;
        Ok(xml)
    }

    /// Walk the document part and collect paragraph text.
    ///
    /// `stack` holds the qualified names of the open elements. Paragraphs
    /// nested in tables or text boxes are not body paragraphs and are skipped.
    fn paragraphs(&self, xml: &str) -> Result<String, ExtractError> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Vec<u8>> = Vec::new();
        let mut paragraph: Option<String> = None;
        let mut text = String::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| ExtractError::parse(self.kind(), e))?;

            match event {
                Event::Start(e) => {
                    let name = e.name().as_ref().to_vec();
                    if name == b"w:p" && is_path(&stack, BODY_PATH) {
                        paragraph = Some(String::new());
                    }
                    stack.push(name);
                }
                Event::Empty(e) => {
                    let name = e.name();
                    let name = name.as_ref();
                    if name == b"w:p" && is_path(&stack, BODY_PATH) {
                        text.push('\n');
                    } else if in_run(&stack) {
                        if let Some(p) = paragraph.as_mut() {
                            match name {
                                b"w:tab" => p.push('\t'),
                                b"w:br" | b"w:cr" => p.push('\n'),
                                _ => {}
                            }
                        }
                    }
                }
                Event::Text(e) => {
                    if in_run_text(&stack) {
                        if let Some(p) = paragraph.as_mut() {
                            let unescaped = e
                                .unescape()
                                .map_err(|err| ExtractError::parse(self.kind(), err))?;
                            p.push_str(&unescaped);
                        }
                    }
                }
                Event::End(_) => {
                    let closed = stack.pop();
                    if closed.as_deref() == Some(b"w:p".as_slice()) && is_path(&stack, BODY_PATH) {
                        if let Some(p) = paragraph.take() {
                            text.push_str(&p);
                            text.push('\n');
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(text)
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let xml = self.read_document_part(bytes)?;
        self.paragraphs(&xml)
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::Docx
    }
}

fn is_path(stack: &[Vec<u8>], path: &[&[u8]]) -> bool {
    stack.len() == path.len() && stack.iter().zip(path).all(|(a, b)| a.as_slice() == *b)
}

/// Inside a run of a body paragraph, directly or through a hyperlink
fn in_run(stack: &[Vec<u8>]) -> bool {
    is_path(stack, RUN_PATH) || is_path(stack, HYPERLINK_RUN_PATH)
}

fn in_run_text(stack: &[Vec<u8>]) -> bool {
    match stack.split_last() {
        Some((last, parent)) => last.as_slice() == b"w:t" && in_run(parent),
        None => false,
    }
}
