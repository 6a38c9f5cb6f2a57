//! Entity codec for GUI-RPC replies.
//!
//! The compute client speaks ad hoc tagged XML: no declaration, no schema,
//! occasional bare flags (`<suspended_via_gui/>`) and CDATA blobs. Instead of
//! one parser subclass per entity, every entity implements [`TagDecode`]: a
//! tag name → field-setter mapping driven by a single generic scanner.
//! Sub-entities embedded in a larger document (host info inside
//! `<client_state>`, `<active_task>` inside `<result>`) are decoded by
//! delegating the same reader to the nested entity's decoder.
//!
//! Failure policy: a malformed numeric field keeps its default and the record
//! survives; a structurally truncated document (an element that never closes)
//! discards the whole decode. Callers treat `None` as "no data", never as
//! "empty data".

pub mod entities;
pub mod reader;

pub use reader::{TagReader, TagToken};

/// One decodable entity: an enclosing element name plus a field dispatcher.
pub trait TagDecode: Default {
    /// Name of the enclosing element, e.g. `"cc_status"`.
    const ELEMENT: &'static str;

    /// Handle one child element. Return `true` if the tag was consumed
    /// (text read or sub-entity decoded); `false` lets the driver skip the
    /// element structurally. Unknown tags must return `false`.
    fn field(&mut self, tag: &str, reader: &mut TagReader<'_>) -> bool;

    /// Handle a bare self-closing child (`<suspended_via_gui/>`). The wire
    /// uses these as boolean "true" flags. Default: ignore.
    fn flag(&mut self, tag: &str) {
        let _ = tag;
    }
}

/// Decode the first `T::ELEMENT` element found in `xml`.
///
/// Returns `None` if the element is absent or structurally truncated.
pub fn decode<T: TagDecode>(xml: &str) -> Option<T> {
    let mut reader = TagReader::new(xml);
    loop {
        match reader.next_tag()? {
            TagToken::Open(name) if name == T::ELEMENT => return decode_into(&mut reader),
            TagToken::Empty(name) if name == T::ELEMENT => return Some(T::default()),
            _ => {}
        }
    }
}

/// Decode every `T::ELEMENT` element in `xml`, in document order.
///
/// A reply that contains none of them decodes to an empty list; a truncated
/// document discards the whole batch.
pub fn decode_all<T: TagDecode>(xml: &str) -> Option<Vec<T>> {
    let mut reader = TagReader::new(xml);
    let mut out = Vec::new();
    loop {
        match reader.next_tag() {
            Some(TagToken::Open(name)) if name == T::ELEMENT => {
                out.push(decode_into(&mut reader)?);
            }
            Some(_) => {}
            None => break,
        }
    }
    if reader.is_truncated() { None } else { Some(out) }
}

/// Decode the body of `T::ELEMENT` whose opening tag has already been
/// consumed. This is the delegation point for nested sub-entities.
pub fn decode_into<T: TagDecode>(reader: &mut TagReader<'_>) -> Option<T> {
    let mut out = T::default();
    loop {
        match reader.next_tag() {
            Some(TagToken::Close(name)) if name == T::ELEMENT => return Some(out),
            Some(TagToken::Open(name)) => {
                if !out.field(name, reader) {
                    reader.skip_element(name);
                }
                if reader.is_truncated() {
                    return None;
                }
            }
            Some(TagToken::Empty(name)) => out.flag(name),
            Some(TagToken::Close(_)) => {}
            None => {
                // ran off the end inside the element
                reader.mark_truncated();
                return None;
            }
        }
    }
}

/// Grab the text of the first `<tag>...</tag>` pair in `xml`. Used where a
/// reply carries a single value (the auth nonce, a message count).
pub fn text_of<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)? + open.len();
    let end = start + xml[start..].find(&close)?;
    Some(xml[start..end].trim())
}

/// Whether `xml` contains `tag` as an element, in either `<tag>` or
/// `<tag/>` form.
pub fn has_tag(xml: &str, tag: &str) -> bool {
    xml.contains(&format!("<{tag}>")) || xml.contains(&format!("<{tag}/>"))
}

/// Escape a value for embedding in a request body.
pub fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Undo entity escapes and CDATA wrapping on reply text.
pub(crate) fn clean_text(raw: &str) -> String {
    let raw = raw
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
        .unwrap_or(raw)
        .trim();
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

pub(crate) fn lenient_i32(text: &str) -> Option<i32> {
    let text = text.trim();
    // some clients print integers with a trailing ".000000"
    text.parse::<i32>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().map(|f| f as i32))
}

pub(crate) fn lenient_f64(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

pub(crate) fn lenient_bool(text: &str) -> Option<bool> {
    match text.trim() {
        "" | "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}
