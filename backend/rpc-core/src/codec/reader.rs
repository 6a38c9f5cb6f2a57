//! Streaming tag scanner over one reply document.

use crate::codec::{clean_text, lenient_bool, lenient_f64, lenient_i32};

/// One tag boundary in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagToken<'a> {
    /// `<name>` (attributes, if any, are ignored)
    Open(&'a str),
    /// `</name>`
    Close(&'a str),
    /// `<name/>` - the wire's boolean-true flag form
    Empty(&'a str),
}

/// Zero-copy scanner. Tolerates the peer's ad hoc XML: skips processing
/// instructions and comments, ignores attributes, and flags structural
/// truncation instead of panicking on it.
pub struct TagReader<'a> {
    src: &'a str,
    pos: usize,
    truncated: bool,
}

impl<'a> TagReader<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            truncated: false,
        }
    }

    /// True once the scanner has run into an unterminated tag or an element
    /// that never closed. A truncated document discards the decode.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub(crate) fn mark_truncated(&mut self) {
        self.truncated = true;
    }

    /// Advance to the next tag boundary. `None` means clean end of input
    /// unless [`is_truncated`](Self::is_truncated) reports otherwise.
    pub fn next_tag(&mut self) -> Option<TagToken<'a>> {
        let src = self.src;
        loop {
            let lt = match src[self.pos..].find('<') {
                Some(i) => self.pos + i,
                None => {
                    self.pos = src.len();
                    return None;
                }
            };
            let start = lt + 1;
            let gt = match src[start..].find('>') {
                Some(i) => start + i,
                None => {
                    self.pos = src.len();
                    self.truncated = true;
                    return None;
                }
            };
            self.pos = gt + 1;
            let inner = &src[start..gt];

            // declarations, comments and PIs carry no entity data
            if inner.starts_with('?') || inner.starts_with('!') {
                continue;
            }
            if let Some(name) = inner.strip_prefix('/') {
                return Some(TagToken::Close(name.trim()));
            }
            let (body, empty) = match inner.strip_suffix('/') {
                Some(body) => (body, true),
                None => (inner, false),
            };
            let name = match body.split_whitespace().next() {
                Some(name) => name,
                None => continue,
            };
            return Some(if empty {
                TagToken::Empty(name)
            } else {
                TagToken::Open(name)
            });
        }
    }

    /// Raw text between the just-consumed `<tag>` and its `</tag>`.
    /// Marks the document truncated if the close never appears.
    pub fn text(&mut self, tag: &str) -> Option<&'a str> {
        let src = self.src;
        let close = format!("</{tag}>");
        let idx = match src[self.pos..].find(&close) {
            Some(i) => self.pos + i,
            None => {
                self.pos = src.len();
                self.truncated = true;
                return None;
            }
        };
        let text = src[self.pos..idx].trim();
        self.pos = idx + close.len();
        Some(text)
    }

    /// Consume the rest of an element we have no field for, honouring
    /// nesting of same-named children.
    pub fn skip_element(&mut self, tag: &str) {
        let mut depth = 1u32;
        while depth > 0 {
            match self.next_tag() {
                Some(TagToken::Open(name)) if name == tag => depth += 1,
                Some(TagToken::Close(name)) if name == tag => depth -= 1,
                Some(_) => {}
                None => {
                    self.truncated = true;
                    return;
                }
            }
        }
    }

    // Typed field helpers for TagDecode impls. A value that fails to parse
    // comes back None and the caller keeps the field's default.

    pub fn i32_field(&mut self, tag: &str) -> Option<i32> {
        self.text(tag).and_then(lenient_i32)
    }

    pub fn f64_field(&mut self, tag: &str) -> Option<f64> {
        self.text(tag).and_then(lenient_f64)
    }

    pub fn bool_field(&mut self, tag: &str) -> Option<bool> {
        self.text(tag).and_then(lenient_bool)
    }

    pub fn string_field(&mut self, tag: &str) -> Option<String> {
        self.text(tag).map(clean_text)
    }
}
