//! Document tree: arena storage and the mutation API.
//!
//! Nodes live in a `Vec` arena owned by the `Document` and are addressed
//! by `NodeId` (a `NonZeroU32`; slot 0 is a reserved placeholder).
//! Sibling lists are doubly linked, so attach and detach are O(1) link
//! surgery. Detached nodes stay alive in the arena, which is what makes
//! `NodeArray` safe: it holds plain ids, and an id stays valid for the
//! lifetime of its document no matter how the tree is rearranged.
//!
//! Every document has at most one root. The parser produces an anonymous
//! root (a node with no name) whose children are the top-level elements;
//! `take_root` can leave a document with none.

mod node;

use std::num::NonZeroU32;

pub use node::{Attribute, NodeData, CDATA_MARKER};

/// Index handle for a node in a `Document` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    fn from_index(index: usize) -> Self {
        // slot 0 is the placeholder, so real indices are never zero
        match NonZeroU32::new(index as u32) {
            Some(raw) => Self(raw),
            None => unreachable!("arena slot 0 is reserved"),
        }
    }

    fn index(self) -> usize {
        self.0.get() as usize
    }
}

/// A document: node arena, optional root, optional doctype name.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: Option<NodeId>,
    doctype: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document with an anonymous root node.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![NodeData::new(None)],
            root: None,
            doctype: None,
        };
        let root = doc.create_node(None);
        doc.root = Some(root);
        doc
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(data);
        NodeId::from_index(index)
    }

    // --- Node construction ---

    /// Creates a detached node.
    pub fn create_node(&mut self, name: Option<&str>) -> NodeId {
        self.alloc(NodeData::new(name.map(str::to_string)))
    }

    /// Creates a named node attached as the last child of `parent`.
    pub fn create_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.create_node(Some(name));
        self.append_child(parent, id);
        id
    }

    /// Creates a CDATA marker node under `parent`. The serializer emits
    /// its payload verbatim inside `<![CDATA[...]]>`.
    pub fn create_cdata(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.create_element(parent, CDATA_MARKER);
        self.set_text(id, text);
        id
    }

    /// Returns the child of `parent` named `name`, creating it if absent.
    pub fn ensure_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        match self.child(parent, name) {
            Some(id) => id,
            None => self.create_element(parent, name),
        }
    }

    // --- Accessors ---

    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.index()].name.as_deref()
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.index()].text.as_deref()
    }

    /// Sets the node's text payload, replacing any previous one.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.nodes[id.index()].text = Some(text.into());
    }

    pub fn clear_text(&mut self, id: NodeId) {
        self.nodes[id.index()].text = None;
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].first_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].next_sibling
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Removes and returns the root. The node stays alive in the arena.
    pub fn take_root(&mut self) -> Option<NodeId> {
        self.root.take()
    }

    /// Installs `id` as the document root. The node must be detached.
    pub fn set_root(&mut self, id: NodeId) {
        debug_assert!(self.nodes[id.index()].parent.is_none());
        self.root = Some(id);
    }

    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    pub fn set_doctype(&mut self, name: impl Into<String>) {
        self.doctype = Some(name.into());
    }

    // --- Attributes ---

    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        &self.nodes[id.index()].attributes
    }

    /// Sets an attribute. An existing attribute with the same name keeps
    /// its position and gets the new value; otherwise the attribute is
    /// appended.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: Option<&str>) {
        let attrs = &mut self.nodes[id.index()].attributes;
        match attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value.map(str::to_string),
            None => attrs.push(Attribute::new(name, value)),
        }
    }

    /// Looks up an attribute. `Some` with a `None` value means the
    /// attribute is present but valueless.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&Attribute> {
        self.nodes[id.index()].attributes.iter().find(|a| a.name == name)
    }

    pub fn attribute_value(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attribute(id, name)?.value.as_deref()
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Removes an attribute, compacting the list. Returns whether it was
    /// present.
    pub fn delete_attribute(&mut self, id: NodeId, name: &str) -> bool {
        let attrs = &mut self.nodes[id.index()].attributes;
        match attrs.iter().position(|a| a.name == name) {
            Some(pos) => {
                attrs.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Attribute match: every attribute in `expected` must be present on
    /// the node with an equal value, where "no value" on both sides
    /// counts as equal. An attribute absent from the node only matches an
    /// expected entry with no value.
    pub fn matches_attributes(&self, id: NodeId, expected: &[Attribute]) -> bool {
        expected.iter().all(|want| {
            let have = self.attribute(id, &want.name).and_then(|a| a.value.as_deref());
            have == want.value.as_deref()
        })
    }

    // --- Children and links ---

    /// Appends `child` as the last child of `parent`, detaching it from
    /// any previous position first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.index()].parent = Some(parent);
        match self.nodes[parent.index()].last_child {
            Some(last) => {
                self.nodes[last.index()].next_sibling = Some(child);
                self.nodes[child.index()].prev_sibling = Some(last);
                self.nodes[parent.index()].last_child = Some(child);
            }
            None => {
                self.nodes[parent.index()].first_child = Some(child);
                self.nodes[parent.index()].last_child = Some(child);
            }
        }
    }

    /// Unlinks a node from its parent and siblings. The node (and its
    /// subtree) stays alive in the arena.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let n = &self.nodes[id.index()];
            (n.parent, n.prev_sibling, n.next_sibling)
        };
        match prev {
            Some(p) => self.nodes[p.index()].next_sibling = next,
            None => {
                if let Some(par) = parent {
                    self.nodes[par.index()].first_child = next;
                }
            }
        }
        match next {
            Some(n) => self.nodes[n.index()].prev_sibling = prev,
            None => {
                if let Some(par) = parent {
                    self.nodes[par.index()].last_child = prev;
                }
            }
        }
        let n = &mut self.nodes[id.index()];
        n.parent = None;
        n.prev_sibling = None;
        n.next_sibling = None;
    }

    /// Moves a node (and its subtree) under a new parent.
    pub fn reparent(&mut self, new_parent: NodeId, id: NodeId) {
        self.append_child(new_parent, id);
    }

    /// Detaches `child` from `parent`. Passing a node that is not a
    /// child of `parent` is a programming error; in release builds the
    /// call is a no-op.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert_eq!(
            self.nodes[child.index()].parent,
            Some(parent),
            "node is not a child of the given parent"
        );
        if self.nodes[child.index()].parent == Some(parent) {
            self.detach(child);
        }
    }

    /// Removes every child of `parent` sharing `child`'s name, then
    /// appends `child`. Returns whether anything was removed.
    pub fn replace_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let name = self.nodes[child.index()].name.clone();
        let removed = match name.as_deref() {
            Some(name) => self.delete_children(parent, name),
            None => false,
        };
        self.append_child(parent, child);
        removed
    }

    /// Removes all children of `parent` named `name`. Returns whether
    /// any were removed.
    pub fn delete_children(&mut self, parent: NodeId, name: &str) -> bool {
        let mut removed = false;
        let mut cur = self.nodes[parent.index()].first_child;
        while let Some(id) = cur {
            cur = self.nodes[id.index()].next_sibling;
            if self.nodes[id.index()].name.as_deref() == Some(name) {
                self.detach(id);
                removed = true;
            }
        }
        removed
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.nodes[id.index()].first_child,
        }
    }

    /// First child of `parent` named `name`.
    pub fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .find(|&c| self.nodes[c.index()].name.as_deref() == Some(name))
    }

    /// Next sibling of `after` named `name`.
    pub fn next_child_named(&self, name: &str, after: NodeId) -> Option<NodeId> {
        let mut cur = self.nodes[after.index()].next_sibling;
        while let Some(id) = cur {
            if self.nodes[id.index()].name.as_deref() == Some(name) {
                return Some(id);
            }
            cur = self.nodes[id.index()].next_sibling;
        }
        None
    }

    /// First child of `parent` with the given name whose attributes
    /// match `expected` (see `matches_attributes`).
    pub fn child_with_attributes(
        &self,
        parent: NodeId,
        name: &str,
        expected: &[Attribute],
    ) -> Option<NodeId> {
        self.children(parent).find(|&c| {
            self.nodes[c.index()].name.as_deref() == Some(name)
                && self.matches_attributes(c, expected)
        })
    }

    // --- Copying and merging ---

    /// Deep copy: name, text, attributes, and children, recursively.
    /// When `parent` is given the copy is attached as its last child.
    pub fn clone_node(&mut self, src: NodeId, parent: Option<NodeId>) -> NodeId {
        let (name, text, attributes) = {
            let n = &self.nodes[src.index()];
            (n.name.clone(), n.text.clone(), n.attributes.clone())
        };
        let mut data = NodeData::new(name);
        data.text = text;
        data.attributes = attributes;
        let copy = self.alloc(data);
        if let Some(p) = parent {
            self.append_child(p, copy);
        }
        let mut cur = self.nodes[src.index()].first_child;
        while let Some(c) = cur {
            cur = self.nodes[c.index()].next_sibling;
            self.clone_node(c, Some(copy));
        }
        copy
    }

    /// Merges `overlay`'s children into `base`: each named overlay child
    /// whose name is absent among `base`'s children is deep-cloned and
    /// appended. Existing children are never overwritten; the name check
    /// is first-level only.
    pub fn merge(&mut self, base: NodeId, overlay: NodeId) {
        let mut cur = self.nodes[overlay.index()].first_child;
        while let Some(c) = cur {
            cur = self.nodes[c.index()].next_sibling;
            if let Some(name) = self.nodes[c.index()].name.clone() {
                if self.child(base, &name).is_none() {
                    self.clone_node(c, Some(base));
                }
            }
        }
    }

    // --- Traversal ---

    /// Stateless depth-first step over `top`'s subtree in document
    /// order. `None` for `current` yields `top` itself; the step after
    /// the last node returns `None`. Never leaves the subtree.
    pub fn next_descendant(&self, top: NodeId, current: Option<NodeId>) -> Option<NodeId> {
        let cur = match current {
            None => return Some(top),
            Some(c) => c,
        };
        if let Some(child) = self.nodes[cur.index()].first_child {
            return Some(child);
        }
        let mut node = cur;
        loop {
            if node == top {
                return None;
            }
            if let Some(sib) = self.nodes[node.index()].next_sibling {
                return Some(sib);
            }
            node = self.nodes[node.index()].parent?;
        }
    }

    /// Like `next_descendant`, skipping nodes whose name is not `name`.
    pub fn next_descendant_named(
        &self,
        top: NodeId,
        name: &str,
        current: Option<NodeId>,
    ) -> Option<NodeId> {
        let mut cur = current;
        loop {
            let id = self.next_descendant(top, cur)?;
            if self.nodes[id.index()].name.as_deref() == Some(name) {
                return Some(id);
            }
            cur = Some(id);
        }
    }

    /// Slash-joined names from `top` (exclusive) down to `id`, returned
    /// by value. Unnamed ancestors contribute nothing; for an unnamed
    /// parentless root the path is `"/"`.
    pub fn path(&self, id: NodeId, top: Option<NodeId>) -> String {
        let mut parts: Vec<&str> = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            if top == Some(n) {
                break;
            }
            let node = &self.nodes[n.index()];
            if let Some(name) = node.name.as_deref() {
                parts.push(name);
            }
            cur = node.parent;
        }
        if parts.is_empty() {
            return "/".to_string();
        }
        parts.reverse();
        parts.join("/")
    }
}

/// Iterator over the children of a node, in order.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.doc.nodes[id.index()].next_sibling;
        Some(id)
    }
}

/// An ordered collection of node ids: weak references into a document's
/// arena. Entries stay valid when nodes are detached, because the arena
/// keeps detached nodes alive.
#[derive(Debug, Clone, Default)]
pub struct NodeArray {
    items: Vec<NodeId>,
}

impl NodeArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: NodeId) {
        self.items.push(id);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.items.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId) {
        let mut doc = Document::new();
        let root = doc.root().unwrap();
        (doc, root)
    }

    #[test]
    fn test_new_document_has_anonymous_root() {
        let (doc, root) = sample();
        assert_eq!(doc.name(root), None);
        assert_eq!(doc.first_child(root), None);
    }

    #[test]
    fn test_create_element_appends_in_order() {
        let (mut doc, root) = sample();
        let a = doc.create_element(root, "a");
        let b = doc.create_element(root, "b");
        let c = doc.create_element(root, "c");
        assert_eq!(doc.children(root).collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(doc.parent(b), Some(root));
    }

    #[test]
    fn test_text_assignment_replaces() {
        let (mut doc, root) = sample();
        let a = doc.create_element(root, "a");
        assert_eq!(doc.text(a), None);
        doc.set_text(a, "first");
        doc.set_text(a, "second");
        assert_eq!(doc.text(a), Some("second"));
        doc.clear_text(a);
        assert_eq!(doc.text(a), None);
    }

    #[test]
    fn test_set_attribute_overwrites_in_place() {
        let (mut doc, root) = sample();
        let a = doc.create_element(root, "a");
        doc.set_attribute(a, "x", Some("1"));
        doc.set_attribute(a, "y", Some("2"));
        doc.set_attribute(a, "x", Some("3"));
        let attrs = doc.attributes(a);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name, "x");
        assert_eq!(attrs[0].value.as_deref(), Some("3"));
        assert_eq!(attrs[1].name, "y");
    }

    #[test]
    fn test_valueless_attribute_is_present() {
        let (mut doc, root) = sample();
        let a = doc.create_element(root, "a");
        doc.set_attribute(a, "hidden", None);
        assert!(doc.has_attribute(a, "hidden"));
        assert_eq!(doc.attribute_value(a, "hidden"), None);
        assert_eq!(doc.attribute_value(a, "missing"), None);
        assert!(!doc.has_attribute(a, "missing"));
    }

    #[test]
    fn test_delete_attribute_compacts() {
        let (mut doc, root) = sample();
        let a = doc.create_element(root, "a");
        doc.set_attribute(a, "x", Some("1"));
        doc.set_attribute(a, "y", Some("2"));
        doc.set_attribute(a, "z", Some("3"));
        assert!(doc.delete_attribute(a, "y"));
        assert!(!doc.delete_attribute(a, "y"));
        let names: Vec<_> = doc.attributes(a).iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["x", "z"]);
    }

    #[test]
    fn test_matches_attributes_absent_equals_absent() {
        let (mut doc, root) = sample();
        let a = doc.create_element(root, "a");
        doc.set_attribute(a, "x", Some("1"));
        assert!(doc.matches_attributes(a, &[Attribute::new("x", Some("1"))]));
        // missing on the node matches an expected valueless entry
        assert!(doc.matches_attributes(a, &[Attribute::new("y", None)]));
        assert!(!doc.matches_attributes(a, &[Attribute::new("x", Some("2"))]));
        assert!(!doc.matches_attributes(a, &[Attribute::new("y", Some("1"))]));
    }

    #[test]
    fn test_detach_and_reparent() {
        let (mut doc, root) = sample();
        let a = doc.create_element(root, "a");
        let b = doc.create_element(root, "b");
        let c = doc.create_element(root, "c");
        doc.detach(b);
        assert_eq!(doc.children(root).collect::<Vec<_>>(), vec![a, c]);
        assert_eq!(doc.parent(b), None);
        // the detached node is still usable
        assert_eq!(doc.name(b), Some("b"));
        doc.reparent(a, b);
        assert_eq!(doc.children(a).collect::<Vec<_>>(), vec![b]);
        assert_eq!(doc.parent(b), Some(a));
    }

    #[test]
    fn test_remove_child() {
        let (mut doc, root) = sample();
        let a = doc.create_element(root, "a");
        doc.remove_child(root, a);
        assert_eq!(doc.children(root).count(), 0);
    }

    #[test]
    fn test_replace_child_removes_all_same_named() {
        let (mut doc, root) = sample();
        let old1 = doc.create_element(root, "result");
        let keep = doc.create_element(root, "log");
        let old2 = doc.create_element(root, "result");
        doc.set_text(old1, "stale");
        doc.set_text(old2, "stale too");
        let fresh = doc.create_node(Some("result"));
        doc.set_text(fresh, "fresh");
        assert!(doc.replace_child(root, fresh));
        let children: Vec<_> = doc.children(root).collect();
        assert_eq!(children, vec![keep, fresh]);
    }

    #[test]
    fn test_replace_child_without_match_appends() {
        let (mut doc, root) = sample();
        let a = doc.create_element(root, "a");
        let fresh = doc.create_node(Some("b"));
        assert!(!doc.replace_child(root, fresh));
        assert_eq!(doc.children(root).collect::<Vec<_>>(), vec![a, fresh]);
    }

    #[test]
    fn test_delete_children_by_name() {
        let (mut doc, root) = sample();
        doc.create_element(root, "x");
        let y = doc.create_element(root, "y");
        doc.create_element(root, "x");
        assert!(doc.delete_children(root, "x"));
        assert_eq!(doc.children(root).collect::<Vec<_>>(), vec![y]);
        assert!(!doc.delete_children(root, "x"));
    }

    #[test]
    fn test_child_lookup() {
        let (mut doc, root) = sample();
        let a1 = doc.create_element(root, "a");
        let b = doc.create_element(root, "b");
        let a2 = doc.create_element(root, "a");
        assert_eq!(doc.child(root, "a"), Some(a1));
        assert_eq!(doc.child(root, "b"), Some(b));
        assert_eq!(doc.child(root, "zzz"), None);
        assert_eq!(doc.next_child_named("a", a1), Some(a2));
        assert_eq!(doc.next_child_named("a", a2), None);
    }

    #[test]
    fn test_child_with_attributes() {
        let (mut doc, root) = sample();
        let t1 = doc.create_element(root, "test");
        doc.set_attribute(t1, "name", Some("alpha"));
        let t2 = doc.create_element(root, "test");
        doc.set_attribute(t2, "name", Some("beta"));
        let want = [Attribute::new("name", Some("beta"))];
        assert_eq!(doc.child_with_attributes(root, "test", &want), Some(t2));
        let missing = [Attribute::new("name", Some("gamma"))];
        assert_eq!(doc.child_with_attributes(root, "test", &missing), None);
    }

    #[test]
    fn test_ensure_child() {
        let (mut doc, root) = sample();
        let a = doc.ensure_child(root, "a");
        let again = doc.ensure_child(root, "a");
        assert_eq!(a, again);
        assert_eq!(doc.children(root).count(), 1);
    }

    #[test]
    fn test_clone_node_is_deep() {
        let (mut doc, root) = sample();
        let src = doc.create_element(root, "suite");
        doc.set_attribute(src, "name", Some("core"));
        doc.set_text(src, "summary");
        let case = doc.create_element(src, "case");
        doc.set_text(case, "detail");

        let copy = doc.clone_node(src, Some(root));
        assert_ne!(copy, src);
        assert_eq!(doc.name(copy), Some("suite"));
        assert_eq!(doc.text(copy), Some("summary"));
        assert_eq!(doc.attribute_value(copy, "name"), Some("core"));
        let copied_case = doc.child(copy, "case").unwrap();
        assert_ne!(copied_case, case);
        assert_eq!(doc.text(copied_case), Some("detail"));

        // mutating the copy leaves the source alone
        doc.set_text(copied_case, "changed");
        assert_eq!(doc.text(case), Some("detail"));
    }

    #[test]
    fn test_merge_skips_existing_names() {
        let (mut doc, root) = sample();
        let base = doc.create_element(root, "base");
        let existing = doc.create_element(base, "shared");
        doc.set_text(existing, "keep me");

        let overlay = doc.create_element(root, "overlay");
        let shared = doc.create_element(overlay, "shared");
        doc.set_text(shared, "do not copy");
        let extra = doc.create_element(overlay, "extra");
        doc.set_text(extra, "copied");

        doc.merge(base, overlay);
        let names: Vec<_> = doc
            .children(base)
            .map(|c| doc.name(c).unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["shared", "extra"]);
        assert_eq!(doc.text(doc.child(base, "shared").unwrap()), Some("keep me"));
        assert_eq!(doc.text(doc.child(base, "extra").unwrap()), Some("copied"));
    }

    #[test]
    fn test_next_descendant_document_order() {
        let (mut doc, root) = sample();
        let a = doc.create_element(root, "a");
        let b = doc.create_element(a, "b");
        let c = doc.create_element(b, "c");
        let d = doc.create_element(a, "d");
        let e = doc.create_element(root, "e");

        let mut seen = Vec::new();
        let mut cur = None;
        while let Some(next) = doc.next_descendant(root, cur) {
            seen.push(next);
            cur = Some(next);
        }
        assert_eq!(seen, vec![root, a, b, c, d, e]);
    }

    #[test]
    fn test_next_descendant_stays_in_subtree() {
        let (mut doc, root) = sample();
        let a = doc.create_element(root, "a");
        let b = doc.create_element(a, "b");
        doc.create_element(root, "outside");

        let mut seen = Vec::new();
        let mut cur = None;
        while let Some(next) = doc.next_descendant(a, cur) {
            seen.push(next);
            cur = Some(next);
        }
        assert_eq!(seen, vec![a, b]);
    }

    #[test]
    fn test_next_descendant_named() {
        let (mut doc, root) = sample();
        let a = doc.create_element(root, "item");
        let b = doc.create_element(a, "other");
        let c = doc.create_element(b, "item");
        let d = doc.create_element(root, "item");

        let mut seen = Vec::new();
        let mut cur = None;
        while let Some(next) = doc.next_descendant_named(root, "item", cur) {
            seen.push(next);
            cur = Some(next);
        }
        assert_eq!(seen, vec![a, c, d]);
    }

    #[test]
    fn test_path() {
        let (mut doc, root) = sample();
        let suite = doc.create_element(root, "suite");
        let case = doc.create_element(suite, "case");
        assert_eq!(doc.path(root, None), "/");
        assert_eq!(doc.path(case, None), "suite/case");
        assert_eq!(doc.path(case, Some(suite)), "case");
    }

    #[test]
    fn test_take_root_and_set_root() {
        let (mut doc, root) = sample();
        doc.create_element(root, "a");
        let taken = doc.take_root();
        assert_eq!(taken, Some(root));
        assert_eq!(doc.root(), None);
        // the subtree is still intact
        assert_eq!(doc.child(root, "a").map(|c| doc.name(c).unwrap().to_string()),
            Some("a".to_string()));
        doc.set_root(root);
        assert_eq!(doc.root(), Some(root));
    }

    #[test]
    fn test_node_array_survives_detach() {
        let (mut doc, root) = sample();
        let a = doc.create_element(root, "a");
        let b = doc.create_element(root, "b");
        let mut arr = NodeArray::new();
        arr.push(a);
        arr.push(b);
        doc.detach(a);
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.get(0), Some(a));
        assert_eq!(doc.name(arr.get(0).unwrap()), Some("a"));
        assert_eq!(arr.iter().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn test_cdata_marker_node() {
        let (mut doc, root) = sample();
        let cd = doc.create_cdata(root, "raw <payload>");
        assert!(doc.node(cd).is_cdata_marker());
        assert_eq!(doc.text(cd), Some("raw <payload>"));
    }
}
