//! Structural access to a document
//!
//! The engine is generic over [`Dom`] so the same validation logic drives
//! the in-memory [`memory::Document`] and a live browser tree.

pub mod memory;

use std::fmt;

use crate::error::DomError;

pub type DomResult<T> = Result<T, DomError>;

/// A mutable element tree the validator can read and annotate
///
/// Read operations never fail; a node that does not support an operation
/// (a text node asked for its attributes, say) answers with the empty value.
/// The two searches are the exception: a query the host cannot run is an
/// error, never an empty result.
pub trait Dom {
    /// Handle to a node in the tree
    type Node: Clone + PartialEq + fmt::Debug;

    /// Whether the node is an editable text element (`input` or `textarea`)
    fn is_field(&self, node: &Self::Node) -> bool;

    /// Current value of a field, empty for anything else
    fn value(&self, node: &Self::Node) -> String;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> DomResult<()>;

    fn remove_attribute(&mut self, node: &Self::Node, name: &str) -> DomResult<()>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn add_class(&mut self, node: &Self::Node, class: &str) -> DomResult<()>;

    fn remove_class(&mut self, node: &Self::Node, class: &str) -> DomResult<()>;

    /// Descendants of `root` (excluding `root`) carrying `class`, in document order
    fn find_by_class(&self, root: &Self::Node, class: &str) -> DomResult<Vec<Self::Node>>;

    /// Descendants of `scope` (excluding `scope`) whose `attr` equals `value`,
    /// in document order
    fn find_by_attribute(
        &self,
        scope: &Self::Node,
        attr: &str,
        value: &str,
    ) -> DomResult<Vec<Self::Node>>;

    fn create_element(&mut self, tag: &str) -> DomResult<Self::Node>;

    fn set_text(&mut self, node: &Self::Node, text: &str) -> DomResult<()>;

    /// Appends `child` to `parent`, detaching it from wherever it was
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> DomResult<()>;

    /// Inserts `child` into `parent` directly before `reference`
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        child: &Self::Node,
        reference: &Self::Node,
    ) -> DomResult<()>;

    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> DomResult<()>;

    /// Puts `new_child` where `old_child` is and detaches `old_child`
    fn replace_child(
        &mut self,
        parent: &Self::Node,
        new_child: &Self::Node,
        old_child: &Self::Node,
    ) -> DomResult<()>;

    /// Nearest node carrying `class`, starting at `node` itself and walking up
    fn closest_with_class(&self, node: &Self::Node, class: &str) -> Option<Self::Node> {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if self.has_class(&candidate, class) {
                return Some(candidate);
            }
            current = self.parent(&candidate);
        }
        None
    }
}
