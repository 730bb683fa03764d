//! Error annotations around fields
//!
//! Where a field's error state lives depends on the markup around it:
//!
//! - **Group**: the field sits inside a container carrying the group class.
//!   The container gets the error class and a single message element.
//! - **Wrap**: anything else. The field is moved into a fresh wrapper
//!   element, placed where the field was, that also holds the message.
//!
//! The strategy is picked again on every call by walking up from the field,
//! so markup changed by the host between calls is always honoured.

use tracing::{trace, warn};

use crate::config::Conventions;
use crate::dom::{Dom, DomResult};

const STYLE_ATTR: &str = "style";

/// Where the error state of one field lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy<N> {
    /// On this ancestor (or the field itself) carrying the group class
    Group(N),
    /// In a wrapper element around the field
    Wrap,
}

/// Shows and clears error annotations
///
/// Both operations are idempotent: showing twice leaves one annotation,
/// resetting an unannotated field changes nothing.
#[derive(Debug, Clone, Copy)]
pub struct Annotator<'a> {
    conventions: &'a Conventions,
}

impl<'a> Annotator<'a> {
    pub fn new(conventions: &'a Conventions) -> Self {
        Self { conventions }
    }

    pub fn strategy<D: Dom>(&self, dom: &D, field: &D::Node) -> Strategy<D::Node> {
        match dom.closest_with_class(field, &self.conventions.group_class) {
            Some(container) => Strategy::Group(container),
            None => Strategy::Wrap,
        }
    }

    /// The wrapper currently around `field`, if any
    pub fn wrapper<D: Dom>(&self, dom: &D, field: &D::Node) -> Option<D::Node> {
        dom.parent(field)
            .filter(|parent| dom.has_class(parent, &self.conventions.wrapper_class))
    }

    /// Marks `field` as invalid, adding `message` as visible text if given
    ///
    /// An empty message is treated as no message. Elements that are not
    /// fields are left alone.
    pub fn show<D: Dom>(
        &self,
        dom: &mut D,
        field: &D::Node,
        message: Option<&str>,
    ) -> DomResult<()> {
        if !dom.is_field(field) {
            return Ok(());
        }
        let c = self.conventions;

        match self.strategy(&*dom, field) {
            Strategy::Group(container) => {
                if !dom.has_class(&container, &c.group_error_class) {
                    dom.add_class(&container, &c.group_error_class)?;
                }
                if dom.find_by_class(&container, &c.message_class)?.is_empty() {
                    self.append_message(dom, &container, message)?;
                }
                trace!(?field, "group annotation shown");
            }
            Strategy::Wrap => {
                if self.wrapper(&*dom, field).is_some() {
                    return Ok(());
                }
                let Some(parent) = dom.parent(field) else {
                    warn!(?field, "field has no parent, cannot wrap it");
                    return Ok(());
                };
                let next = dom.next_sibling(field);

                let wrapper = dom.create_element(&c.wrapper_tag)?;
                dom.add_class(&wrapper, &c.wrapper_class)?;
                let style = dom.attribute(field, STYLE_ATTR).unwrap_or_default();
                dom.set_attribute(&wrapper, &c.saved_style_attr, &style)?;
                dom.append_child(&wrapper, field)?;
                self.append_message(dom, &wrapper, message)?;

                match next {
                    Some(next) => dom.insert_before(&parent, &wrapper, &next)?,
                    None => dom.append_child(&parent, &wrapper)?,
                }
                trace!(?field, "field wrapped");
            }
        }
        Ok(())
    }

    /// Removes any annotation from `field`
    pub fn reset<D: Dom>(&self, dom: &mut D, field: &D::Node) -> DomResult<()> {
        if !dom.is_field(field) {
            return Ok(());
        }
        let c = self.conventions;

        match self.strategy(&*dom, field) {
            Strategy::Group(container) => {
                if dom.has_class(&container, &c.group_error_class) {
                    dom.remove_class(&container, &c.group_error_class)?;
                }
                for message in dom.find_by_class(&container, &c.message_class)? {
                    if let Some(holder) = dom.parent(&message) {
                        dom.remove_child(&holder, &message)?;
                    }
                }
            }
            Strategy::Wrap => {
                let Some(wrapper) = self.wrapper(&*dom, field) else {
                    return Ok(());
                };
                let Some(outer) = dom.parent(&wrapper) else {
                    return Ok(());
                };
                let saved = dom.attribute(&wrapper, &c.saved_style_attr);
                dom.replace_child(&outer, field, &wrapper)?;

                // a wrapper without the saved attribute was not made here
                match saved.as_deref() {
                    Some("") => dom.remove_attribute(field, STYLE_ATTR)?,
                    Some(style) => dom.set_attribute(field, STYLE_ATTR, style)?,
                    None => {}
                }
                trace!(?field, "field unwrapped");
            }
        }
        Ok(())
    }

    fn append_message<D: Dom>(
        &self,
        dom: &mut D,
        holder: &D::Node,
        message: Option<&str>,
    ) -> DomResult<()> {
        let Some(text) = message.filter(|m| !m.is_empty()) else {
            return Ok(());
        };
        let element = dom.create_element(&self.conventions.message_tag)?;
        dom.add_class(&element, &self.conventions.message_class)?;
        dom.set_text(&element, text)?;
        dom.append_child(holder, &element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{Document, NodeId};
    use pretty_assertions::assert_eq;

    /// `<form><label/><input name="email"/><button/></form>`
    fn bare_form(doc: &mut Document) -> (NodeId, NodeId) {
        let form = doc.append(doc.root(), "form");
        doc.append(form, "label");
        let input = doc.append(form, "input");
        doc.with_attr(input, "name", "email");
        doc.append(form, "button");
        (form, input)
    }

    /// `<form><div class="form-group"><label><input/></label></div></form>`
    fn group_form(doc: &mut Document) -> (NodeId, NodeId, NodeId) {
        let form = doc.append(doc.root(), "form");
        let group = doc.append(form, "div");
        doc.with_attr(group, "class", "form-group");
        let label = doc.append(group, "label");
        let input = doc.append(label, "input");
        doc.with_attr(input, "name", "email");
        (form, group, input)
    }

    #[test]
    fn test_strategy_selection() {
        let conventions = Conventions::default();
        let annotator = Annotator::new(&conventions);
        let mut doc = Document::new();
        let (_, input) = bare_form(&mut doc);
        let (_, group, grouped) = group_form(&mut doc);

        assert_eq!(annotator.strategy(&doc, &input), Strategy::Wrap);
        assert_eq!(annotator.strategy(&doc, &grouped), Strategy::Group(group));
    }

    #[test]
    fn test_group_show_and_reset() {
        let conventions = Conventions::default();
        let annotator = Annotator::new(&conventions);
        let mut doc = Document::new();
        let (form, group, input) = group_form(&mut doc);
        let before = doc.render(form);

        annotator.show(&mut doc, &input, Some("Bad email")).unwrap();
        assert!(doc.has_class(&group, "has-error"));
        let messages = doc.find_by_class(&group, "text-invalid").unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(doc.tag(messages[0]), "p");
        assert_eq!(doc.text(messages[0]), Some("Bad email"));

        annotator.reset(&mut doc, &input).unwrap();
        assert_eq!(doc.render(form), before);
    }

    #[test]
    fn test_group_show_is_idempotent() {
        let conventions = Conventions::default();
        let annotator = Annotator::new(&conventions);
        let mut doc = Document::new();
        let (form, _, input) = group_form(&mut doc);

        annotator.show(&mut doc, &input, Some("first")).unwrap();
        let once = doc.render(form);
        annotator.show(&mut doc, &input, Some("second")).unwrap();

        assert_eq!(doc.render(form), once);
    }

    #[test]
    fn test_group_show_without_message_sets_marker_only() {
        let conventions = Conventions::default();
        let annotator = Annotator::new(&conventions);
        let mut doc = Document::new();
        let (_, group, input) = group_form(&mut doc);

        annotator.show(&mut doc, &input, None).unwrap();
        annotator.show(&mut doc, &input, Some("")).unwrap();

        assert!(doc.has_class(&group, "has-error"));
        assert!(doc.find_by_class(&group, "text-invalid").unwrap().is_empty());
    }

    #[test]
    fn test_group_reset_removes_nested_messages() {
        let conventions = Conventions::default();
        let annotator = Annotator::new(&conventions);
        let mut doc = Document::new();
        let (_, group, input) = group_form(&mut doc);
        let label = doc.children(group)[0];
        let stray = doc.append(label, "p");
        doc.with_attr(stray, "class", "text-invalid");

        annotator.show(&mut doc, &input, Some("msg")).unwrap();
        annotator.reset(&mut doc, &input).unwrap();

        assert!(doc.find_by_class(&group, "text-invalid").unwrap().is_empty());
        assert!(!doc.has_class(&group, "has-error"));
    }

    #[test]
    fn test_wrap_keeps_position() {
        let conventions = Conventions::default();
        let annotator = Annotator::new(&conventions);
        let mut doc = Document::new();
        let (form, input) = bare_form(&mut doc);

        annotator.show(&mut doc, &input, Some("Bad email")).unwrap();

        let wrapper = doc.parent(&input).unwrap();
        assert_eq!(doc.children(form)[1], wrapper);
        assert_eq!(doc.children(form).len(), 3);
        assert_eq!(
            doc.render(wrapper),
            r#"<div class="invalid" data-validator-style=""><input name="email" value=""></input><p class="text-invalid">Bad email</p></div>"#
        );
    }

    #[test]
    fn test_wrap_last_child_appends() {
        let conventions = Conventions::default();
        let annotator = Annotator::new(&conventions);
        let mut doc = Document::new();
        let form = doc.append(doc.root(), "form");
        let first = doc.append(form, "span");
        let input = doc.append(form, "textarea");

        annotator.show(&mut doc, &input, None).unwrap();

        let wrapper = doc.parent(&input).unwrap();
        assert_eq!(doc.children(form), &[first, wrapper]);
        assert_eq!(doc.children(wrapper), &[input]);
    }

    #[test]
    fn test_wrap_show_is_idempotent() {
        let conventions = Conventions::default();
        let annotator = Annotator::new(&conventions);
        let mut doc = Document::new();
        let (form, input) = bare_form(&mut doc);

        annotator.show(&mut doc, &input, Some("one")).unwrap();
        let once = doc.render(form);
        annotator.show(&mut doc, &input, Some("two")).unwrap();

        assert_eq!(doc.render(form), once);
    }

    #[test]
    fn test_wrap_round_trip_restores_style() {
        let conventions = Conventions::default();
        let annotator = Annotator::new(&conventions);
        let mut doc = Document::new();
        let (form, input) = bare_form(&mut doc);
        doc.with_attr(input, "style", "width: 10em");
        let before = doc.render(form);

        annotator.show(&mut doc, &input, Some("Bad email")).unwrap();
        doc.set_attribute(&input, "style", "border: 1px solid red").unwrap();
        annotator.reset(&mut doc, &input).unwrap();

        assert_eq!(doc.render(form), before);
    }

    #[test]
    fn test_wrap_round_trip_without_style() {
        let conventions = Conventions::default();
        let annotator = Annotator::new(&conventions);
        let mut doc = Document::new();
        let (form, input) = bare_form(&mut doc);
        let before = doc.render(form);

        annotator.show(&mut doc, &input, None).unwrap();
        annotator.reset(&mut doc, &input).unwrap();

        assert_eq!(doc.render(form), before);
        assert!(doc.find_by_class(&form, "invalid").unwrap().is_empty());
    }

    #[test]
    fn test_reset_without_annotation_is_noop() {
        let conventions = Conventions::default();
        let annotator = Annotator::new(&conventions);
        let mut doc = Document::new();
        let (form, input) = bare_form(&mut doc);
        let (group_root, _, grouped) = group_form(&mut doc);
        let before = (doc.render(form), doc.render(group_root));

        annotator.reset(&mut doc, &input).unwrap();
        annotator.reset(&mut doc, &grouped).unwrap();

        assert_eq!((doc.render(form), doc.render(group_root)), before);
    }

    #[test]
    fn test_non_field_is_ignored() {
        let conventions = Conventions::default();
        let annotator = Annotator::new(&conventions);
        let mut doc = Document::new();
        let form = doc.append(doc.root(), "form");
        let div = doc.append(form, "div");
        let before = doc.render(form);

        annotator.show(&mut doc, &div, Some("nope")).unwrap();

        assert_eq!(doc.render(form), before);
    }

    #[test]
    fn test_detached_field_is_not_wrapped() {
        let conventions = Conventions::default();
        let annotator = Annotator::new(&conventions);
        let mut doc = Document::new();
        let input = doc.element("input");

        annotator.show(&mut doc, &input, Some("msg")).unwrap();

        assert_eq!(doc.parent(&input), None);
    }
}
