use serde::{Deserialize, Serialize};
use std::fmt;

/// Document format, decided from the declared filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Html,
    PlainText,
}

impl DocumentKind {
    /// Pick a kind from the filename suffix.
    ///
    /// Matching is case-sensitive on the full suffix, so `lease.PDF` is read
    /// as plain text. Anything unrecognised falls back to plain text.
    pub fn from_filename(filename: &str) -> Self {
        if filename.ends_with(".pdf") {
            DocumentKind::Pdf
        } else if filename.ends_with(".docx") {
            DocumentKind::Docx
        } else if filename.ends_with(".htm") || filename.ends_with(".html") {
            DocumentKind::Html
        } else {
            DocumentKind::PlainText
        }
    }

    /// Whether extraction for this kind can fail on malformed input
    pub fn can_fail(&self) -> bool {
        matches!(self, DocumentKind::Pdf | DocumentKind::Docx)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Docx => "DOCX",
            DocumentKind::Html => "HTML",
            DocumentKind::PlainText => "plain text",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_pdf() {
        assert_eq!(DocumentKind::from_filename("lease.pdf"), DocumentKind::Pdf);
    }

    #[test]
    fn test_kind_docx() {
        assert_eq!(DocumentKind::from_filename("lease.docx"), DocumentKind::Docx);
    }

    #[test]
    fn test_kind_html_both_suffixes() {
        assert_eq!(DocumentKind::from_filename("t.htm"), DocumentKind::Html);
        assert_eq!(DocumentKind::from_filename("t.html"), DocumentKind::Html);
    }

    #[test]
    fn test_kind_is_case_sensitive() {
        assert_eq!(DocumentKind::from_filename("LEASE.PDF"), DocumentKind::PlainText);
        assert_eq!(DocumentKind::from_filename("lease.Docx"), DocumentKind::PlainText);
    }

    #[test]
    fn test_kind_fallback() {
        assert_eq!(DocumentKind::from_filename("notes.txt"), DocumentKind::PlainText);
        assert_eq!(DocumentKind::from_filename("README"), DocumentKind::PlainText);
        assert_eq!(DocumentKind::from_filename("lease.doc"), DocumentKind::PlainText);
        assert_eq!(DocumentKind::from_filename(""), DocumentKind::PlainText);
    }

    #[test]
    fn test_only_binary_formats_can_fail() {
        assert!(DocumentKind::Pdf.can_fail());
        assert!(DocumentKind::Docx.can_fail());
        assert!(!DocumentKind::Html.can_fail());
        assert!(!DocumentKind::PlainText.can_fail());
    }
}
