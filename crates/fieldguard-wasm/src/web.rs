//! `Dom` over a live browser document

use std::fmt::Write as _;

use fieldguard::{Dom, DomError, DomResult};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement, HtmlTextAreaElement, Node, NodeList};

/// Browser document seen through the validator's [`Dom`] trait
///
/// Holds the owning `Document` only to create new elements; every other
/// operation goes straight to the nodes.
#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Document that owns `node`, if it is attached to one
    pub fn for_node(node: &Node) -> Option<Self> {
        node.owner_document().map(Self::new)
    }
}

fn js_error(err: JsValue) -> DomError {
    DomError::new(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

fn element(node: &Node) -> DomResult<&Element> {
    node.dyn_ref::<Element>()
        .ok_or_else(|| DomError::new("node is not an element"))
}

/// Quotes a value for use inside a double-quoted CSS attribute selector
fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Escapes a name for use as a CSS identifier, like `CSS.escape`
fn css_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let leading_dash = name.starts_with('-');
    for (i, c) in name.chars().enumerate() {
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => {
                let _ = write!(out, "\\{:x} ", u32::from(c));
            }
            '0'..='9' if i == 0 || (i == 1 && leading_dash) => {
                let _ = write!(out, "\\{:x} ", u32::from(c));
            }
            '-' if i == 0 && name.len() == 1 => out.push_str("\\-"),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() => {
                out.push(c)
            }
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

fn collect(list: NodeList) -> Vec<Node> {
    (0..list.length()).filter_map(|i| list.item(i)).collect()
}

fn query_all(root: &Node, selector: &str) -> DomResult<Vec<Node>> {
    element(root)?
        .query_selector_all(selector)
        .map(collect)
        .map_err(js_error)
}

impl Dom for WebDom {
    type Node = Node;

    fn is_field(&self, node: &Node) -> bool {
        node.is_instance_of::<HtmlInputElement>() || node.is_instance_of::<HtmlTextAreaElement>()
    }

    fn value(&self, node: &Node) -> String {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else {
            String::new()
        }
    }

    fn attribute(&self, node: &Node, name: &str) -> Option<String> {
        node.dyn_ref::<Element>().and_then(|e| e.get_attribute(name))
    }

    fn has_attribute(&self, node: &Node, name: &str) -> bool {
        node.dyn_ref::<Element>()
            .is_some_and(|e| e.has_attribute(name))
    }

    fn set_attribute(&mut self, node: &Node, name: &str, value: &str) -> DomResult<()> {
        element(node)?.set_attribute(name, value).map_err(js_error)
    }

    fn remove_attribute(&mut self, node: &Node, name: &str) -> DomResult<()> {
        element(node)?.remove_attribute(name).map_err(js_error)
    }

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn next_sibling(&self, node: &Node) -> Option<Node> {
        node.next_sibling()
    }

    fn has_class(&self, node: &Node, class: &str) -> bool {
        node.dyn_ref::<Element>()
            .is_some_and(|e| e.class_list().contains(class))
    }

    fn add_class(&mut self, node: &Node, class: &str) -> DomResult<()> {
        element(node)?.class_list().add_1(class).map_err(js_error)
    }

    fn remove_class(&mut self, node: &Node, class: &str) -> DomResult<()> {
        element(node)?.class_list().remove_1(class).map_err(js_error)
    }

    fn find_by_class(&self, root: &Node, class: &str) -> DomResult<Vec<Node>> {
        query_all(root, &format!("[class~={}]", css_string(class)))
    }

    fn find_by_attribute(&self, scope: &Node, attr: &str, value: &str) -> DomResult<Vec<Node>> {
        query_all(scope, &format!("[{}={}]", css_ident(attr), css_string(value)))
    }

    fn create_element(&mut self, tag: &str) -> DomResult<Node> {
        self.document
            .create_element(tag)
            .map(Node::from)
            .map_err(js_error)
    }

    fn set_text(&mut self, node: &Node, text: &str) -> DomResult<()> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn append_child(&mut self, parent: &Node, child: &Node) -> DomResult<()> {
        parent.append_child(child).map(drop).map_err(js_error)
    }

    fn insert_before(&mut self, parent: &Node, child: &Node, reference: &Node) -> DomResult<()> {
        parent
            .insert_before(child, Some(reference))
            .map(drop)
            .map_err(js_error)
    }

    fn remove_child(&mut self, parent: &Node, child: &Node) -> DomResult<()> {
        parent.remove_child(child).map(drop).map_err(js_error)
    }

    fn replace_child(
        &mut self,
        parent: &Node,
        new_child: &Node,
        old_child: &Node,
    ) -> DomResult<()> {
        parent
            .replace_child(new_child, old_child)
            .map(drop)
            .map_err(js_error)
    }
}
