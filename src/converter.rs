use crate::error::ConvertError;
use crate::extractor::types::docx::DOCUMENT_PART;
use quick_xml::escape::partial_escape;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Suggested download name for a generated term sheet
pub const DOWNLOAD_NAME: &str = "lease_term_sheet.docx";

/// MIME type of a WordprocessingML package
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style></w:styles>"#;

const CORE_PROPERTIES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Lease Term Sheet</dc:title><dc:creator>termsheet</dc:creator></cp:coreProperties>"#;

const DOCUMENT_HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

const DOCUMENT_TAIL: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#;

/// Render text as a DOCX package, one paragraph per line.
///
/// Blank lines become empty paragraphs so the vertical layout of the
/// source text survives. Lines are never merged or re-wrapped.
pub fn text_to_docx(text: &str) -> Result<Vec<u8>, ConvertError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", PACKAGE_RELS.to_string()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
        ("word/styles.xml", STYLES.to_string()),
        ("docProps/core.xml", CORE_PROPERTIES.to_string()),
        (DOCUMENT_PART, document_xml(text)),
    ];
    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    let buffer = zip.finish()?.into_inner();
    tracing::debug!(
        paragraphs = text.split('\n').count(),
        bytes = buffer.len(),
        "Rendered DOCX"
    );
    Ok(buffer)
}

fn document_xml(text: &str) -> String {
    let mut xml = String::with_capacity(DOCUMENT_HEAD.len() + text.len() * 2);
    xml.push_str(DOCUMENT_HEAD);
    for line in text.split('\n') {
        if line.is_empty() {
            xml.push_str("<w:p/>");
        } else {
            xml.push_str(r#"<w:p><w:r><w:t xml:space="preserve">"#);
            xml.push_str(&escape_text(line));
            xml.push_str("</w:t></w:r></w:p>");
        }
    }
    xml.push_str(DOCUMENT_TAIL);
    xml
}

/// Escape a line for a `w:t` element.
///
/// `\r` is written as a character reference so parsers do not normalise it
/// away. Characters not allowed in XML 1.0 are dropped.
fn escape_text(line: &str) -> String {
    let kept: String = line
        .chars()
        .filter(|&c| matches!(c, '\t' | '\r') || is_xml_char(c))
        .collect();
    kept.split('\r')
        .map(partial_escape)
        .collect::<Vec<_>>()
        .join("&#13;")
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}
