//! HTML tag tokenizer
//!
//! Turns text into the ordered [`TagEvent`] stream the structural validator
//! consumes. Only tags matter here: text, comments, declarations and
//! processing instructions are skipped, attributes are stepped over without
//! being interpreted. Every event is positioned at its `<`.
//!
//! Behaviour worth knowing about:
//! - tag names are lowercased
//! - `<name/>` produces an `Open` immediately followed by a `Close`
//! - `script` and `style` bodies are raw text and produce no events
//! - a `<` that cannot start markup is plain text

use super::event::TagEvent;
use crate::position::LineIndex;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";
const CDATA_START: &str = "<![CDATA[";
const CDATA_END: &str = "]]>";

/// Elements whose body the tokenizer skips up to the matching end tag
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

fn starts_with_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

fn is_name_terminator(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'/' | b'>' | b'<' | 0)
}

/// Tokenize `input` into tag events
pub fn tokenize(input: &str) -> Vec<TagEvent> {
    Tokenizer::new(input).run()
}

struct Tokenizer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    index: LineIndex<'a>,
    events: Vec<TagEvent>,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            index: LineIndex::new(input),
            events: Vec::new(),
        }
    }

    // Slices are only cut at ASCII bytes, so every offset handed to `input`
    // stays on a char boundary.
    fn run(mut self) -> Vec<TagEvent> {
        while let Some(rel) = self.bytes[self.pos..].iter().position(|&b| b == b'<') {
            let start = self.pos + rel;
            let input = self.input;
            let rest = &input[start..];

            let next = if rest.starts_with(COMMENT_START) {
                self.skip_past(start, start + COMMENT_START.len(), COMMENT_END, "Unterminated comment")
            } else if rest.starts_with(CDATA_START) {
                self.skip_past(start, start + CDATA_START.len(), CDATA_END, "Unterminated CDATA section")
            } else if rest.starts_with("<!") {
                self.skip_past(start, start + 2, ">", "Unterminated declaration")
            } else if rest.starts_with("<?") {
                self.skip_past(start, start + 2, ">", "Unterminated processing instruction")
            } else if rest.starts_with("</") {
                self.end_tag(start)
            } else if self.bytes.get(start + 1).is_some_and(u8::is_ascii_alphabetic) {
                self.start_tag(start)
            } else {
                Some(start + 1)
            };

            match next {
                Some(next) => self.pos = next,
                None => break,
            }
        }

        self.events
    }

    fn skip_past(&mut self, start: usize, from: usize, terminator: &str, message: &str) -> Option<usize> {
        match self.input[from..].find(terminator) {
            Some(i) => Some(from + i + terminator.len()),
            None => {
                self.lex_error(start, message.to_string());
                None
            }
        }
    }

    fn start_tag(&mut self, start: usize) -> Option<usize> {
        let name_start = start + 1;
        let name_end = self.scan_name(name_start);
        let name = self.input[name_start..name_end].to_lowercase();

        let Some((tag_end, self_closing)) = self.scan_attributes(name_end) else {
            self.lex_error(start, format!("Unterminated tag <{}", name));
            return None;
        };

        let position = self.index.position(start);
        self.events.push(TagEvent::open(name.clone(), position));

        if self_closing {
            self.events.push(TagEvent::close(name, position));
            return Some(tag_end);
        }

        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            return self.skip_raw_text(&name, start, tag_end);
        }

        Some(tag_end)
    }

    fn end_tag(&mut self, start: usize) -> Option<usize> {
        let name_start = start + 2;

        match self.bytes.get(name_start).copied() {
            Some(b) if b.is_ascii_alphabetic() => {
                let name_end = self.scan_name(name_start);
                let name = self.input[name_start..name_end].to_lowercase();

                match self.input[name_end..].find('>') {
                    Some(i) => {
                        let position = self.index.position(start);
                        self.events.push(TagEvent::close(name, position));
                        Some(name_end + i + 1)
                    }
                    None => {
                        self.lex_error(start, format!("Unterminated closing tag </{}", name));
                        None
                    }
                }
            }
            Some(b'>') => {
                self.lex_error(start, "Empty closing tag </>".to_string());
                Some(name_start + 1)
            }
            Some(_) => {
                self.lex_error(start, "Malformed closing tag".to_string());
                self.input[name_start..].find('>').map(|i| name_start + i + 1)
            }
            None => {
                self.lex_error(start, "Unterminated closing tag".to_string());
                None
            }
        }
    }

    fn scan_name(&self, from: usize) -> usize {
        self.bytes[from..]
            .iter()
            .position(|&b| is_name_terminator(b))
            .map_or(self.bytes.len(), |i| from + i)
    }

    /// Step over attributes up to the closing `>`; returns the offset after it
    /// and whether the tag used the `/>` form
    fn scan_attributes(&self, from: usize) -> Option<(usize, bool)> {
        let mut quote: Option<u8> = None;
        // last non-whitespace byte seen outside quotes
        let mut prev = 0u8;

        for (i, &b) in self.bytes[from..].iter().enumerate() {
            if let Some(q) = quote {
                if b == q {
                    quote = None;
                    prev = b;
                }
                continue;
            }

            match b {
                b'"' | b'\'' if prev == b'=' => quote = Some(b),
                b'>' => return Some((from + i + 1, prev == b'/')),
                _ if b.is_ascii_whitespace() => {}
                _ => prev = b,
            }
        }

        None
    }

    /// Skip a raw text body; returns the offset of its end tag so the main
    /// loop emits the close event
    fn skip_raw_text(&mut self, name: &str, start: usize, from: usize) -> Option<usize> {
        let close = format!("</{}", name);
        let needle = close.as_bytes();
        let mut i = from;

        while let Some(rel) = self.bytes[i..].iter().position(|&b| b == b'<') {
            let at = i + rel;
            if starts_with_ignore_ascii_case(&self.bytes[at..], needle)
                && self
                    .bytes
                    .get(at + needle.len())
                    .map_or(true, |&b| is_name_terminator(b))
            {
                return Some(at);
            }
            i = at + 1;
        }

        self.lex_error(start, format!("Unterminated <{}> content", name));
        None
    }

    fn lex_error(&mut self, offset: usize, message: String) {
        let position = self.index.position(offset);
        self.events.push(TagEvent::lex_error(message, position));
    }
}
