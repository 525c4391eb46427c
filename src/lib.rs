//! A small, permissive XML document engine.
//!
//! Parses XML-like input into a mutable document tree, supports
//! reworking the tree in place, and serializes it back out in a form
//! the parser reads back into an equal tree. The dialect is
//! deliberately lean: no validation, no namespaces, a three-entity
//! vocabulary (`&lt;`, `&gt;`, `&amp;`) plus decimal character
//! references, comments and processing instructions consumed but never
//! stored.
//!
//! Every document owns an arena of nodes addressed by [`NodeId`]. The
//! parser installs an anonymous root whose children are the top-level
//! elements, so input with several top-level elements is accepted.
//!
//! # Quick start
//!
//! ```
//! let mut doc = microxml::parse_str(r#"<suite name="core"><case id="1"/></suite>"#)?;
//! let root = doc.root().expect("fresh documents have a root");
//! let suite = doc.child(root, "suite").expect("parsed above");
//! assert_eq!(doc.attribute_value(suite, "name"), Some("core"));
//!
//! let case = doc.child(suite, "case").expect("parsed above");
//! doc.set_text(case, "passed");
//!
//! let xml = microxml::serialize(&doc);
//! assert!(xml.contains("<case id=\"1\">passed</case>"));
//! # Ok::<(), microxml::Error>(())
//! ```

pub mod error;
pub mod parser;
pub mod serial;
pub mod tree;

pub use error::{Error, ParseError, SourceLocation};
pub use parser::{
    parse_file, parse_reader, parse_str, parse_str_with_options, ParseOptions, DEFAULT_MAX_DEPTH,
};
pub use serial::{serialize, serialize_to};
pub use tree::{Attribute, Children, Document, NodeArray, NodeData, NodeId, CDATA_MARKER};
