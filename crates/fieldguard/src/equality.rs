//! Cross-field equality

use tracing::trace;

use crate::annotate::Annotator;
use crate::config::Conventions;
use crate::dom::Dom;
use crate::error::ValidationError;
use crate::field::{MessageKind, Messages};

/// Result of comparing a group of fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualityOutcome<N> {
    pub matches: bool,
    /// Fields whose value differs from the first field's value
    pub mismatched: Vec<N>,
}

/// Compares the current values of `fields`
///
/// Groups of zero or one field always match.
pub fn check<D: Dom>(dom: &D, fields: &[D::Node]) -> EqualityOutcome<D::Node> {
    let Some((first, rest)) = fields.split_first() else {
        return EqualityOutcome {
            matches: true,
            mismatched: Vec::new(),
        };
    };

    let expected = dom.value(first);
    let mismatched: Vec<D::Node> = rest
        .iter()
        .filter(|field| dom.value(field) != expected)
        .cloned()
        .collect();

    EqualityOutcome {
        matches: mismatched.is_empty(),
        mismatched,
    }
}

/// Checks the group and annotates it when the values differ
///
/// Only fields that carry a message-bundle attribute are annotated, each
/// with its `equals` message if it declares one. Fields without the
/// attribute still count towards the result but get no annotation.
pub fn check_and_annotate<D: Dom>(
    dom: &mut D,
    fields: &[D::Node],
    conventions: &Conventions,
) -> Result<bool, ValidationError> {
    if fields.len() < 2 {
        return Ok(true);
    }
    let outcome = check(&*dom, fields);
    if outcome.matches {
        return Ok(true);
    }
    trace!(mismatched = outcome.mismatched.len(), "equality group failed");

    let annotator = Annotator::new(conventions);
    for field in fields {
        let Some(source) = dom.attribute(field, &conventions.messages_attr) else {
            continue;
        };
        let name = dom.attribute(field, &conventions.name_attr).unwrap_or_default();
        let messages = Messages::parse(&name, &source)?;
        annotator.show(dom, field, messages.get(MessageKind::Equals))?;
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{Document, NodeId};
    use pretty_assertions::assert_eq;

    fn inputs(doc: &mut Document, values: &[&str]) -> Vec<NodeId> {
        let form = doc.append(doc.root(), "form");
        values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let input = doc.append(form, "input");
                doc.with_attr(input, "name", &format!("f{i}"));
                doc.set_value(input, value);
                input
            })
            .collect()
    }

    #[test]
    fn test_all_equal() {
        let mut doc = Document::new();
        let fields = inputs(&mut doc, &["a", "a", "a"]);

        assert_eq!(
            check(&doc, &fields),
            EqualityOutcome {
                matches: true,
                mismatched: vec![]
            }
        );
    }

    #[test]
    fn test_one_differs() {
        let mut doc = Document::new();
        let fields = inputs(&mut doc, &["a", "b", "a"]);

        assert_eq!(
            check(&doc, &fields),
            EqualityOutcome {
                matches: false,
                mismatched: vec![fields[1]]
            }
        );
    }

    #[test]
    fn test_trivial_groups() {
        let mut doc = Document::new();
        let fields = inputs(&mut doc, &["only"]);

        assert!(check(&doc, &[]).matches);
        assert!(check(&doc, &fields).matches);
    }

    #[test]
    fn test_empty_values_match() {
        let mut doc = Document::new();
        let fields = inputs(&mut doc, &["", ""]);

        assert!(check(&doc, &fields).matches);
    }

    #[test]
    fn test_annotates_only_fields_with_bundle() {
        let conventions = Conventions::default();
        let mut doc = Document::new();
        let fields = inputs(&mut doc, &["secret", "secrte", "other"]);
        doc.with_attr(fields[0], "data-validator-messages", r#"{"equals":"Passwords differ"}"#);
        doc.with_attr(fields[1], "data-validator-messages", r#"{"required":"x"}"#);

        let matches = check_and_annotate(&mut doc, &fields, &conventions).unwrap();
        assert!(!matches);

        let annotator = Annotator::new(&conventions);
        let first = annotator.wrapper(&doc, &fields[0]).unwrap();
        assert_eq!(
            doc.render(first),
            r#"<div class="invalid" data-validator-style=""><input data-validator-messages="{"equals":"Passwords differ"}" name="f0" value="secret"></input><p class="text-invalid">Passwords differ</p></div>"#
        );
        // bundle without an equals entry: annotated, no text
        let second = annotator.wrapper(&doc, &fields[1]).unwrap();
        assert_eq!(doc.children(second), &[fields[1]]);
        // no bundle at all: untouched
        assert!(annotator.wrapper(&doc, &fields[2]).is_none());
    }

    #[test]
    fn test_matching_group_leaves_no_annotation() {
        let conventions = Conventions::default();
        let mut doc = Document::new();
        let fields = inputs(&mut doc, &["x", "x"]);
        doc.with_attr(fields[0], "data-validator-messages", r#"{"equals":"differ"}"#);

        assert!(check_and_annotate(&mut doc, &fields, &conventions).unwrap());
        assert!(Annotator::new(&conventions).wrapper(&doc, &fields[0]).is_none());
    }

    #[test]
    fn test_malformed_bundle_is_error() {
        let conventions = Conventions::default();
        let mut doc = Document::new();
        let fields = inputs(&mut doc, &["x", "y"]);
        doc.with_attr(fields[1], "data-validator-messages", "{");

        assert!(matches!(
            check_and_annotate(&mut doc, &fields, &conventions),
            Err(ValidationError::MalformedMessages { .. })
        ));
    }
}
