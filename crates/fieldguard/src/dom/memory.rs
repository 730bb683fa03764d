//! In-memory element tree
//!
//! Arena-backed so node handles are plain indices.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::{Dom, DomResult};
use crate::error::DomError;

/// Handle to an element in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct NodeData {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    value: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An element tree rooted at a `<body>` element
///
/// Nodes are never freed: a detached node keeps its slot, and its
/// [`NodeId`], for the lifetime of the document. Each failing validation
/// that wraps a field or adds a message creates new elements, so a
/// document validated over and over grows by those elements every time.
/// Build a fresh `Document` per form snapshot when that matters;
/// [`Document::node_count`] reports the current size.
///
/// A [`NodeId`] this document never handed out reads as an empty, detached
/// element and is rejected by searches and every mutation.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                tag: "body".to_string(),
                ..NodeData::default()
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes ever created, attached or not, the root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn data(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.0)
    }

    /// Creates a detached element
    pub fn element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            ..NodeData::default()
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Creates an element and appends it to `parent`
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.element(tag);
        self.attach(parent, id, None);
        id
    }

    pub fn tag(&self, node: NodeId) -> &str {
        self.data(node).map_or("", |d| d.tag.as_str())
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.data(node).map_or(&[], |d| d.children.as_slice())
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.data(node)?.text.as_deref()
    }

    /// Sets the current value of a field; unknown nodes are ignored
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.value = value.to_string();
        }
    }

    /// Sets an attribute, builder style; unknown nodes are ignored
    pub fn with_attr(&mut self, node: NodeId, name: &str, value: &str) -> NodeId {
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.attributes.insert(name.to_string(), value.to_string());
        }
        node
    }

    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.data(node)
            .and_then(|d| d.attributes.get("class"))
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Every descendant of `node` in document order, `node` excluded
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Serialises a subtree as HTML-like text
    ///
    /// Field values are shown as a `value` attribute so that two renders
    /// compare equal only when the whole observable state matches.
    pub fn render(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.render_into(node, &mut out);
        out
    }

    fn render_into(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.data(node) else {
            return;
        };
        let _ = write!(out, "<{}", data.tag);
        for (name, value) in &data.attributes {
            let _ = write!(out, " {}=\"{}\"", name, value);
        }
        if self.is_field(&node) {
            let _ = write!(out, " value=\"{}\"", data.value);
        }
        out.push('>');
        if let Some(text) = &data.text {
            out.push_str(text);
        }
        for child in &data.children {
            self.render_into(*child, out);
        }
        let _ = write!(out, "</{}>", data.tag);
    }

    fn check(&self, node: NodeId) -> DomResult<()> {
        if node.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(DomError::new(format!("unknown node {:?}", node)))
        }
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.data(id).and_then(|d| d.parent);
        }
        false
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, at: Option<usize>) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        match at {
            Some(index) if index <= children.len() => children.insert(index, child),
            _ => children.push(child),
        }
        self.nodes[child.0].parent = Some(parent);
    }

    fn index_in(&self, parent: NodeId, child: NodeId) -> DomResult<usize> {
        self.children(parent)
            .iter()
            .position(|c| *c == child)
            .ok_or_else(|| DomError::new(format!("{:?} is not a child of {:?}", child, parent)))
    }

    fn guard_cycle(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.is_ancestor_or_self(child, parent) {
            return Err(DomError::new(format!(
                "cannot insert {:?} into its own subtree",
                child
            )));
        }
        Ok(())
    }
}

impl Dom for Document {
    type Node = NodeId;

    fn is_field(&self, node: &NodeId) -> bool {
        matches!(self.tag(*node), "input" | "textarea")
    }

    fn value(&self, node: &NodeId) -> String {
        match self.data(*node) {
            Some(data) if self.is_field(node) => data.value.clone(),
            _ => String::new(),
        }
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.data(*node)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> DomResult<()> {
        self.check(*node)?;
        self.with_attr(*node, name, value);
        Ok(())
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) -> DomResult<()> {
        self.check(*node)?;
        self.nodes[node.0].attributes.remove(name);
        Ok(())
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.data(*node)?.parent
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let parent = self.data(*node)?.parent?;
        let index = self.index_in(parent, *node).ok()?;
        self.children(parent).get(index + 1).copied()
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.classes(*node).contains(&class)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) -> DomResult<()> {
        self.check(*node)?;
        if self.has_class(node, class) {
            return Ok(());
        }
        let mut classes: Vec<String> = self.classes(*node).into_iter().map(String::from).collect();
        classes.push(class.to_string());
        self.with_attr(*node, "class", &classes.join(" "));
        Ok(())
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) -> DomResult<()> {
        self.check(*node)?;
        if !self.has_class(node, class) {
            return Ok(());
        }
        let classes: Vec<String> = self
            .classes(*node)
            .into_iter()
            .filter(|c| *c != class)
            .map(String::from)
            .collect();
        self.with_attr(*node, "class", &classes.join(" "));
        Ok(())
    }

    fn find_by_class(&self, root: &NodeId, class: &str) -> DomResult<Vec<NodeId>> {
        self.check(*root)?;
        Ok(self
            .descendants(*root)
            .into_iter()
            .filter(|n| self.has_class(n, class))
            .collect())
    }

    fn find_by_attribute(
        &self,
        scope: &NodeId,
        attr: &str,
        value: &str,
    ) -> DomResult<Vec<NodeId>> {
        self.check(*scope)?;
        Ok(self
            .descendants(*scope)
            .into_iter()
            .filter(|n| self.attribute(n, attr).as_deref() == Some(value))
            .collect())
    }

    fn create_element(&mut self, tag: &str) -> DomResult<NodeId> {
        Ok(self.element(tag))
    }

    fn set_text(&mut self, node: &NodeId, text: &str) -> DomResult<()> {
        self.check(*node)?;
        self.nodes[node.0].text = Some(text.to_string());
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> DomResult<()> {
        self.check(*parent)?;
        self.check(*child)?;
        self.guard_cycle(*parent, *child)?;
        self.attach(*parent, *child, None);
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: &NodeId,
        child: &NodeId,
        reference: &NodeId,
    ) -> DomResult<()> {
        self.check(*parent)?;
        self.check(*child)?;
        self.guard_cycle(*parent, *child)?;
        self.index_in(*parent, *reference)?;
        self.detach(*child);
        // index again: detaching may have shifted the reference
        let index = self.index_in(*parent, *reference)?;
        self.attach(*parent, *child, Some(index));
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> DomResult<()> {
        self.check(*parent)?;
        self.index_in(*parent, *child)?;
        self.detach(*child);
        Ok(())
    }

    fn replace_child(
        &mut self,
        parent: &NodeId,
        new_child: &NodeId,
        old_child: &NodeId,
    ) -> DomResult<()> {
        self.check(*parent)?;
        self.check(*new_child)?;
        self.index_in(*parent, *old_child)?;
        if new_child == old_child {
            return Ok(());
        }
        self.guard_cycle(*parent, *new_child)?;
        self.detach(*new_child);
        let index = self.index_in(*parent, *old_child)?;
        self.detach(*old_child);
        self.attach(*parent, *new_child, Some(index));
        Ok(())
    }
}
