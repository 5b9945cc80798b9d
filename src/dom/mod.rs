//! In-memory host document.
//!
//! The board lives in a small arena tree of element and text nodes. Elements
//! carry a class list and string attributes; text nodes carry text. Every write
//! is counted, and writes whose target is covered by an observation
//! registration are queued as [`MutationRecord`]s until drained with
//! [`Document::take_records`].
//!
//! Removing a node only detaches it from its parent, so records can still be
//! inspected after the fact. Detached subtrees are reclaimed by
//! [`Document::sweep`] once their records have been handled; their slots are
//! then reused by later nodes.

mod helpers;
pub mod layout;
mod mutation;

pub use helpers::*;
pub use mutation::*;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    released: bool,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
            released: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    detached: Vec<NodeId>,
    root: NodeId,
    observed: HashMap<NodeId, ObserveOptions>,
    records: Vec<MutationRecord>,
    provenance: Provenance,
    writes: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut root = Node::new(NodeKind::Element);
        root.classes.push("board".to_string());
        Self {
            nodes: vec![root],
            free: Vec::new(),
            detached: Vec::new(),
            root: NodeId(0),
            observed: HashMap::new(),
            records: Vec::new(),
            provenance: Provenance::Host,
            writes: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Whether `id` refers to a live node of this document.
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len() && !self.nodes[id.0].released
    }

    /// Number of live nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn allocate(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    // ============================================================
    // Creation
    // ============================================================

    /// Create a detached element with the given classes.
    pub fn create_element(&mut self, classes: &[&str]) -> NodeId {
        let mut node = Node::new(NodeKind::Element);
        node.classes = classes.iter().map(|c| c.to_string()).collect();
        self.allocate(node)
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        let mut node = Node::new(NodeKind::Text);
        node.text = text.to_string();
        self.allocate(node)
    }

    // ============================================================
    // Structure
    // ============================================================

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.last().copied()
    }

    /// Whether the node is attached to the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Insert `child` into `parent` before `reference`, or at the end when the
    /// reference is `None` or not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if self.parent(child).is_some() {
            self.remove(child);
        }

        let position = reference.and_then(|r| self.children(parent).iter().position(|&c| c == r));
        let children = &mut self.node_mut(parent).children;
        match position {
            Some(index) => children.insert(index, child),
            None => children.push(child),
        }
        self.node_mut(child).parent = Some(parent);

        let record = MutationRecord::child_list(parent, vec![child], Vec::new(), self.provenance);
        self.record(record);
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Detach a node from its parent. Detached nodes keep their subtree.
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        self.node_mut(parent).children.retain(|&c| c != id);
        self.node_mut(id).parent = None;
        self.detached.push(id);

        let record = MutationRecord::child_list(parent, Vec::new(), vec![id], self.provenance);
        self.record(record);
    }

    // ============================================================
    // Classes and attributes
    // ============================================================

    pub fn classes(&self, id: NodeId) -> &[String] {
        &self.node(id).classes
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.contains(id) && self.node(id).classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        self.node_mut(id).classes.push(class.to_string());
        let record = MutationRecord::attribute(id, "class", self.provenance);
        self.record(record);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if !self.has_class(id, class) {
            return;
        }
        self.node_mut(id).classes.retain(|c| c != class);
        let record = MutationRecord::attribute(id, "class", self.provenance);
        self.record(record);
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).attributes.get(name).map(String::as_str)
    }

    /// Set an attribute. Writing the value it already has is not a change.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if self.attribute(id, name) == Some(value) {
            return;
        }
        self.node_mut(id)
            .attributes
            .insert(name.to_string(), value.to_string());
        let record = MutationRecord::attribute(id, name, self.provenance);
        self.record(record);
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if self.node_mut(id).attributes.remove(name).is_some() {
            let record = MutationRecord::attribute(id, name, self.provenance);
            self.record(record);
        }
    }

    // ============================================================
    // Text
    // ============================================================

    /// Concatenated text of the node and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let node = self.node(id);
        match node.kind {
            NodeKind::Text => node.text.clone(),
            NodeKind::Element => node
                .children
                .iter()
                .map(|&child| self.text_content(child))
                .collect(),
        }
    }

    /// Change the text of a text node in place.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let node = self.node(id);
        if node.kind != NodeKind::Text || node.text == text {
            return;
        }
        self.node_mut(id).text = text.to_string();
        let record = MutationRecord::character_data(id, self.provenance);
        self.record(record);
    }

    /// Replace all children of an element with a single text node. An element
    /// that already holds a single text node has that node's text changed in
    /// place instead.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if self.kind(id) == NodeKind::Text {
            self.set_text(id, text);
            return;
        }
        let only_text = match self.children(id) {
            [child] if self.kind(*child) == NodeKind::Text => Some(*child),
            _ => None,
        };
        if let Some(child) = only_text {
            self.set_text(child, text);
            return;
        }

        let removed = std::mem::take(&mut self.node_mut(id).children);
        for &child in &removed {
            self.node_mut(child).parent = None;
        }
        self.detached.extend(removed.iter().copied());
        let text_node = self.create_text(text);
        self.node_mut(id).children.push(text_node);
        self.node_mut(text_node).parent = Some(id);

        let record = MutationRecord::child_list(id, vec![text_node], removed, self.provenance);
        self.record(record);
    }

    // ============================================================
    // Queries
    // ============================================================

    /// First descendant of `scope` (in document order) carrying `class`.
    pub fn query(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        for &child in self.children(scope) {
            if self.has_class(child, class) {
                return Some(child);
            }
            if let Some(found) = self.query(child, class) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants of `scope` carrying `class`, in document order.
    pub fn query_all(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.collect(scope, class, &mut found);
        found
    }

    fn collect(&self, scope: NodeId, class: &str, found: &mut Vec<NodeId>) {
        for &child in self.children(scope) {
            if self.has_class(child, class) {
                found.push(child);
            }
            self.collect(child, class, found);
        }
    }

    /// Nearest ancestor-or-self carrying `class`.
    pub fn closest(&self, id: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.has_class(node, class) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    // ============================================================
    // Observation
    // ============================================================

    /// Register interest in changes to `target`. Re-observing a target
    /// replaces its options; observing it again with the same options is a
    /// no-op.
    pub fn observe(&mut self, target: NodeId, options: ObserveOptions) {
        self.observed.insert(target, options);
    }

    pub fn is_observed(&self, target: NodeId) -> bool {
        self.observed.contains_key(&target)
    }

    /// Drain the queued mutation records.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    /// Attribute subsequent writes to `provenance`, returning the previous one.
    pub fn set_provenance(&mut self, provenance: Provenance) -> Provenance {
        std::mem::replace(&mut self.provenance, provenance)
    }

    /// Number of writes (observed or not) performed so far.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    /// Release every subtree detached since the last sweep that is still
    /// detached, and drop observation registrations on its nodes. Returns the
    /// number of nodes released.
    ///
    /// Ids of released nodes become invalid and are handed out again, so call
    /// this only after the pending records have been handled.
    pub fn sweep(&mut self) -> usize {
        let mut released = 0;
        for top in std::mem::take(&mut self.detached) {
            if !self.contains(top) || self.is_connected(top) {
                continue;
            }
            // Still hanging under another detached node; released with it.
            if self.parent(top).is_some() {
                continue;
            }
            let mut stack = vec![top];
            while let Some(id) = stack.pop() {
                stack.append(&mut self.node_mut(id).children);
                let mut husk = Node::new(NodeKind::Text);
                husk.released = true;
                self.nodes[id.0] = husk;
                self.observed.remove(&id);
                self.free.push(id);
                released += 1;
            }
        }
        released
    }

    fn record(&mut self, record: MutationRecord) {
        self.writes += 1;
        if self.is_reported(&record) {
            self.records.push(record);
        }
    }

    fn is_reported(&self, record: &MutationRecord) -> bool {
        let mut current = Some(record.target);
        while let Some(node) = current {
            if let Some(options) = self.observed.get(&node) {
                if (node == record.target || options.subtree) && options.accepts(record.kind) {
                    return true;
                }
            }
            current = self.parent(node);
        }
        false
    }
}
