use crate::error::ExtractError;
use crate::extractor::{DocumentKind, TextExtractor};
use std::collections::HashSet;

/// Elements whose content is never emitted
const SUPPRESSED_ELEMENTS: &[&str] = &["script", "style"];

/// HTML extractor: visible text chunks, one per line.
///
/// Never fails. Malformed markup yields whatever text was recovered.
pub struct HtmlExtractor;

impl TextExtractor for HtmlExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        Ok(html_to_text(&decode_dropping_invalid(bytes)))
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::Html
    }
}

/// Decode UTF-8, silently dropping undecodable byte sequences
pub fn decode_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Strip markup and return the visible text chunks joined by newlines
pub fn html_to_text(html: &str) -> String {
    let mut collector = TextCollector::default();
    for token in Tokenizer::new(html) {
        collector.handle(token);
    }
    collector.chunks.join("\n")
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    StartTag { name: String, self_closing: bool },
    EndTag { name: String },
    Text(&'a str),
}

/// Accumulates text outside suppressed elements.
///
/// Suppression is a set of open tag names, not a stack: any open
/// `<script>`/`<style>` hides text until an end tag with the same name.
#[derive(Default)]
struct TextCollector {
    suppressed: HashSet<String>,
    chunks: Vec<String>,
}

impl TextCollector {
    fn handle(&mut self, token: Token<'_>) {
        match token {
            Token::StartTag { name, self_closing } => {
                if SUPPRESSED_ELEMENTS.contains(&name.as_str()) && !self_closing {
                    self.suppressed.insert(name);
                }
            }
            Token::EndTag { name } => {
                self.suppressed.remove(&name);
            }
            Token::Text(text) => {
                if self.suppressed.is_empty() {
                    let decoded = htmlize::unescape(text);
                    let trimmed = decoded.trim();
                    if !trimmed.is_empty() {
                        self.chunks.push(trimmed.to_string());
                    }
                }
            }
        }
    }
}

/// Forgiving HTML tokenizer.
///
/// Comments, declarations and processing instructions are skipped. Content
/// of script/style is raw text up to the matching close tag. Anything left
/// unterminated at end of input is dropped.
struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    raw_text_element: Option<String>,
}

enum Step<'a> {
    Emit(Token<'a>),
    Skipped,
    Done,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw_text_element: None,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn raw_text(&mut self, element: String) -> Step<'a> {
        let close = format!("</{}", element);
        let rest = self.rest();
        match find_ignore_ascii_case(rest, &close) {
            Some(0) => Step::Skipped,
            Some(offset) => {
                self.pos += offset;
                Step::Emit(Token::Text(&rest[..offset]))
            }
            // unclosed raw text element swallows the rest of the input
            None => Step::Done,
        }
    }

    /// Parse the construct starting at the `<` under the cursor
    fn markup(&mut self) -> Step<'a> {
        let rest = self.rest();
        let mut chars = rest[1..].chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => self.start_tag(),
            Some('/') => match chars.next() {
                Some(c) if c.is_ascii_alphabetic() => self.end_tag(),
                // `</>` and `</ ...>` are ignored
                _ => self.skip_past(">"),
            },
            Some('!') if rest.starts_with("<!--") => {
                self.pos += 4;
                self.skip_past("-->")
            }
            Some('!') | Some('?') => self.skip_past(">"),
            Some(_) => {
                self.pos += 1;
                Step::Emit(Token::Text("<"))
            }
            // lone `<` at end of input
            None => Step::Done,
        }
    }

    fn skip_past(&mut self, terminator: &str) -> Step<'a> {
        match self.rest().find(terminator) {
            Some(offset) => {
                self.pos += offset + terminator.len();
                Step::Skipped
            }
            None => Step::Done,
        }
    }

    fn start_tag(&mut self) -> Step<'a> {
        let rest = self.rest();
        let Some(end) = find_tag_end(rest) else {
            return Step::Done;
        };
        let inner = &rest[1..end];
        self.pos += end + 1;

        let name = tag_name(inner);
        let self_closing = inner.trim_end().ends_with('/');
        if !self_closing && SUPPRESSED_ELEMENTS.contains(&name.as_str()) {
            self.raw_text_element = Some(name.clone());
        }
        Step::Emit(Token::StartTag { name, self_closing })
    }

    fn end_tag(&mut self) -> Step<'a> {
        let rest = self.rest();
        let Some(end) = find_tag_end(rest) else {
            return Step::Done;
        };
        let name = tag_name(&rest[2..end]);
        self.pos += end + 1;
        Step::Emit(Token::EndTag { name })
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            if self.pos >= self.input.len() {
                return None;
            }

            let step = match self.raw_text_element.take() {
                Some(element) => self.raw_text(element),
                None => {
                    let rest = self.rest();
                    match rest.find('<') {
                        Some(0) => self.markup(),
                        Some(offset) => {
                            self.pos += offset;
                            Step::Emit(Token::Text(&rest[..offset]))
                        }
                        None => {
                            self.pos = self.input.len();
                            Step::Emit(Token::Text(rest))
                        }
                    }
                }
            };

            match step {
                Step::Emit(token) => return Some(token),
                Step::Skipped => continue,
                Step::Done => {
                    self.pos = self.input.len();
                    return None;
                }
            }
        }
    }
}

/// Byte offset of the `>` closing a tag, ignoring `>` inside quoted values
fn find_tag_end(tag: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in tag.char_indices().skip(1) {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(i),
            None => {}
        }
    }
    None
}

fn tag_name(inner: &str) -> String {
    inner
        .split(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}
