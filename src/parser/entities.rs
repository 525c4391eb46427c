//! Entity resolution and escaping.
//!
//! The tokenizer recognizes a deliberately small entity set: the named
//! entities `&lt;`, `&gt;`, and `&amp;` (case-insensitive) and decimal
//! character references `&#NNN;`. Anything else is a hard lexical error —
//! the engine is permissive about most input but never guesses at an
//! unknown entity.
//!
//! The escape helpers are the inverse, used by the serializer. Both take
//! a fast path that scans with `memchr` and hands the input back borrowed
//! when nothing needs escaping.

use std::borrow::Cow;

use memchr::{memchr2, memchr3};

/// Upper bound on the byte length of an entity body (between `&` and `;`).
pub(crate) const MAX_ENTITY_LENGTH: usize = 128;

/// Resolves an entity body (the part between `&` and `;`) to a character.
///
/// Returns `None` for unknown entities, malformed character references,
/// and code points that are not valid Unicode scalars.
pub(crate) fn resolve(body: &str) -> Option<char> {
    if let Some(digits) = body.strip_prefix('#') {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        return char::from_u32(digits.parse().ok()?);
    }
    if body.eq_ignore_ascii_case("lt") {
        Some('<')
    } else if body.eq_ignore_ascii_case("gt") {
        Some('>')
    } else if body.eq_ignore_ascii_case("amp") {
        Some('&')
    } else {
        None
    }
}

/// Escapes text content so it survives re-tokenization: `<`, `>`, and `&`
/// become entity references.
pub(crate) fn escape_text(text: &str) -> Cow<'_, str> {
    if memchr3(b'<', b'>', b'&', text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escapes an attribute value for emission inside double quotes.
///
/// The tokenizer honors backslash escapes inside double-quoted strings,
/// so `\` and `"` are escaped with backslashes rather than entities.
pub(crate) fn escape_attribute_value(value: &str) -> Cow<'_, str> {
    if memchr2(b'"', b'\\', value.as_bytes()).is_none() {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
