//! Node storage types.
//!
//! A node carries an optional name (the anonymous document root has
//! none), an optional text payload, and an ordered attribute list.
//! Navigation links live here too but are maintained exclusively by
//! `Document`; the parent link is a non-owning backref into the arena.

use super::NodeId;

/// Name of the marker node whose text payload the serializer wraps in a
/// `<![CDATA[...]]>` section, verbatim.
pub const CDATA_MARKER: &str = "![CDATA[";

/// A single attribute. The value is optional: `<input hidden>` carries
/// an attribute named `hidden` with no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            name: name.into(),
            value: value.map(str::to_string),
        }
    }
}

/// Payload and links for one arena slot.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub(crate) name: Option<String>,
    /// Single text payload. Assigned, never appended: when a parse sees
    /// several text runs under one element, the last one wins.
    pub(crate) text: Option<String>,
    pub(crate) attributes: Vec<Attribute>,

    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
}

impl NodeData {
    pub(crate) fn new(name: Option<String>) -> Self {
        Self {
            name,
            text: None,
            attributes: Vec::new(),
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Whether this is a CDATA marker node.
    pub fn is_cdata_marker(&self) -> bool {
        self.name.as_deref() == Some(CDATA_MARKER)
    }
}
