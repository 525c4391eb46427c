//! XML writer.
//!
//! Output is written so the parser reads it back into an equal tree:
//! text escapes `<`, `>`, and `&` as entities, and attribute values
//! escape `"` and `\` with backslashes (the escape the tokenizer honors
//! inside double quotes).
//!
//! Element-only content is pretty-printed with two-space indentation;
//! the parser discards whitespace that sits between tags, so the
//! indentation never becomes text. A node carrying a text payload is
//! written compactly instead, with the text flush against its tags,
//! because whitespace adjacent to character data would be read back as
//! part of it.
//!
//! A payload that plain text cannot carry through the tokenizer — one
//! with consecutive newlines (which blank-line collapsing would merge)
//! or nothing but whitespace (which the before-`<` discard would drop)
//! — is wrapped in a `<![CDATA[...]]>` section instead, since the
//! tokenizer reads those back verbatim.
//!
//! Marker nodes named `![CDATA[` have their payload wrapped in a
//! `<![CDATA[...]]>` section, verbatim.

use std::io::{self, Write};

use crate::parser::entities::{escape_attribute_value, escape_text};
use crate::tree::{Document, NodeId};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf8\"?>";

/// Serializes a document to a string, starting with the XML declaration.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    out.push('\n');
    if let Some(root) = doc.root() {
        write_node(doc, root, 0, false, &mut out);
    }
    out
}

/// Serializes a document to a writer.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn serialize_to(doc: &Document, mut out: impl Write) -> io::Result<()> {
    out.write_all(serialize(doc).as_bytes())
}

fn write_node(doc: &Document, id: NodeId, indent: usize, compact: bool, out: &mut String) {
    let node = doc.node(id);
    if node.is_cdata_marker() {
        if !compact {
            push_pad(out, indent);
        }
        out.push_str("<![CDATA[");
        if let Some(text) = node.text() {
            out.push_str(text);
        }
        out.push_str("]]>");
        if !compact {
            out.push('\n');
        }
        return;
    }
    let name = match node.name() {
        Some(name) => name,
        None => {
            // the anonymous root writes no tags of its own
            match node.text() {
                Some(text) => {
                    push_text(out, text);
                    for child in doc.children(id) {
                        write_node(doc, child, 0, true, out);
                    }
                }
                None => {
                    for child in doc.children(id) {
                        write_node(doc, child, indent, compact, out);
                    }
                }
            }
            return;
        }
    };
    if !compact {
        push_pad(out, indent);
    }
    out.push('<');
    out.push_str(name);
    for attr in node.attributes() {
        out.push(' ');
        out.push_str(&attr.name);
        if let Some(value) = &attr.value {
            out.push_str("=\"");
            out.push_str(&escape_attribute_value(value));
            out.push('"');
        }
    }
    let has_children = doc.first_child(id).is_some();
    match node.text() {
        None if !has_children => {
            out.push_str("/>");
            if !compact {
                out.push('\n');
            }
        }
        // a text payload forces compact output for the whole content
        Some(text) => {
            out.push('>');
            push_text(out, text);
            for child in doc.children(id) {
                write_node(doc, child, 0, true, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
            if !compact {
                out.push('\n');
            }
        }
        None => {
            out.push('>');
            if !compact {
                out.push('\n');
            }
            for child in doc.children(id) {
                write_node(doc, child, indent + 2, compact, out);
            }
            if !compact {
                push_pad(out, indent);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
            if !compact {
                out.push('\n');
            }
        }
    }
}

/// Writes a text payload. Payloads the tokenizer would mangle as plain
/// text — consecutive newlines fall to blank-line collapsing, and
/// whitespace-only runs to the before-`<` discard — go out as a verbatim
/// CDATA section; everything else is entity-escaped.
fn push_text(out: &mut String, text: &str) {
    if text.contains("\n\n") || text.chars().all(char::is_whitespace) {
        out.push_str("<![CDATA[");
        out.push_str(text);
        out.push_str("]]>");
    } else {
        out.push_str(&escape_text(text));
    }
}

fn push_pad(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push(' ');
    }
}
