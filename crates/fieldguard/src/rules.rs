//! Rule evaluation for a single field

use tracing::trace;

use crate::config::Conventions;
use crate::dom::Dom;
use crate::error::ValidationError;
use crate::field::{Field, Rule};
use crate::patterns::Pattern;

/// Length as browsers count it, in UTF-16 code units
pub fn value_length(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Checks `value` against the minimum-length text of a `minlength` attribute
///
/// The text is read the way a browser script coerces it to a number: blank
/// text is zero, `0x`/`0o`/`0b` prefixes select a radix and `Infinity` is
/// spelled out. Text that is not a number can never be satisfied.
pub fn satisfies_min_length(value: &str, min: &str) -> bool {
    match parse_number(min) {
        Some(min) => value_length(value) as f64 >= min,
        None => false,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &text[2..];
        if digits.is_empty() {
            return None;
        }
        return digits.chars().try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        });
    }

    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    // `str::parse` also takes `inf` and `NaN`, which are not numbers here
    if text.chars().any(|c| c.is_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    text.parse::<f64>().ok()
}

impl Rule {
    /// Whether `value` passes this rule
    ///
    /// Fails with [`ValidationError::UnknownPattern`] for a pattern name the
    /// registry does not know.
    pub fn check(&self, value: &str) -> Result<bool, ValidationError> {
        Ok(match self {
            Rule::Required => value_length(value) != 0,
            Rule::MinLength(min) => satisfies_min_length(value, min),
            Rule::Pattern(name) => Pattern::lookup(name)?.matches(value),
        })
    }
}

/// Evaluates every rule a field declares
///
/// `on_failure` runs once per failed rule, in the order required,
/// minlength, pattern, with the field's custom message for that rule if
/// one is declared. It receives the document so it can annotate; the
/// evaluator itself never mutates anything.
///
/// Returns `Ok(false)` without calling `on_failure` when `node` is not an
/// editable text field.
pub fn evaluate<D, F>(
    dom: &mut D,
    node: &D::Node,
    conventions: &Conventions,
    mut on_failure: F,
) -> Result<bool, ValidationError>
where
    D: Dom,
    F: FnMut(&mut D, &D::Node, Option<&str>) -> Result<(), ValidationError>,
{
    let Some(field) = Field::read(&*dom, node, conventions)? else {
        return Ok(false);
    };

    let mut valid = true;
    for rule in field.rules() {
        if rule.check(&field.value)? {
            continue;
        }
        trace!(field = %field.name, rule = %rule.kind(), "rule failed");
        valid = false;
        on_failure(dom, node, field.message(rule.kind()))?;
    }
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{Document, NodeId};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn field(doc: &mut Document, value: &str, attrs: &[(&str, &str)]) -> NodeId {
        let input = doc.append(doc.root(), "input");
        doc.with_attr(input, "name", "f");
        for (name, val) in attrs {
            doc.with_attr(input, name, val);
        }
        doc.set_value(input, value);
        input
    }

    /// Runs the evaluator, recording every failure message
    fn run(
        doc: &mut Document,
        node: NodeId,
    ) -> Result<(bool, Vec<Option<String>>), ValidationError> {
        let mut failures = Vec::new();
        let valid = evaluate(doc, &node, &Conventions::default(), |_, _, message| {
            failures.push(message.map(String::from));
            Ok(())
        })?;
        Ok((valid, failures))
    }

    #[test]
    fn test_no_rules_passes_silently() {
        let mut doc = Document::new();
        let input = field(&mut doc, "", &[]);

        assert_eq!(run(&mut doc, input).unwrap(), (true, vec![]));
    }

    #[rstest]
    #[case("", false)]
    #[case("x", true)]
    #[case(" ", true)]
    fn test_required(#[case] value: &str, #[case] expected: bool) {
        let mut doc = Document::new();
        let input = field(&mut doc, value, &[("required", "")]);

        let (valid, failures) = run(&mut doc, input).unwrap();
        assert_eq!(valid, expected);
        assert_eq!(failures.len(), usize::from(!expected));
    }

    #[rstest]
    #[case("abcd", "5", false)]
    #[case("abcde", "5", true)]
    // "9" sorts after "10" as text
    #[case("abcdefghi", "10", false)]
    #[case("abcdefghij", "10", true)]
    #[case("abcdefghijk", "10", true)]
    #[case("ab", "02", true)]
    #[case("ab", " 3 ", false)]
    #[case("", "0", true)]
    #[case("abc", "2.5", true)]
    #[case("abc", "many", false)]
    #[case("abcdefghijklmnopq", "0x10", true)]
    #[case("abcdefghijklmnop", "0X11", false)]
    #[case("abcde", "0b101", true)]
    #[case("abcdefg", "0o10", false)]
    #[case("abc", "0x", false)]
    #[case("abc", "-0x1", false)]
    #[case("abc", "0xg", false)]
    #[case("abc", "1e1", false)]
    #[case("abc", "Infinity", false)]
    #[case("abc", "-Infinity", true)]
    #[case("abc", "inf", false)]
    #[case("abc", "NaN", false)]
    fn test_min_length(#[case] value: &str, #[case] min: &str, #[case] expected: bool) {
        let mut doc = Document::new();
        let input = field(&mut doc, value, &[("minlength", min)]);

        let (valid, failures) = run(&mut doc, input).unwrap();
        assert_eq!(valid, expected, "{value:?} vs {min:?}");
        assert_eq!(failures.len(), usize::from(!expected));
    }

    #[test]
    fn test_min_length_counts_utf16_units() {
        // one astral character is two UTF-16 units
        assert!(satisfies_min_length("😀", "2"));
        assert!(!satisfies_min_length("é", "2"));
    }

    #[test]
    fn test_pattern() {
        let mut doc = Document::new();
        let good = field(&mut doc, "555-123-4567", &[("data-validator-pattern", "phone")]);
        let bad = field(&mut doc, "call me", &[("data-validator-pattern", "phone")]);

        assert_eq!(run(&mut doc, good).unwrap(), (true, vec![]));
        assert_eq!(run(&mut doc, bad).unwrap(), (false, vec![None]));
    }

    #[test]
    fn test_unknown_pattern_is_error() {
        let mut doc = Document::new();
        let input = field(&mut doc, "anything", &[("data-validator-pattern", "postcode")]);

        let err = run(&mut doc, input).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownPattern(ref name) if name == "postcode"));
    }

    #[test]
    fn test_failures_in_fixed_order_with_messages() {
        let mut doc = Document::new();
        let input = field(
            &mut doc,
            "",
            &[
                ("data-validator-pattern", "email"),
                ("minlength", "4"),
                ("required", ""),
                (
                    "data-validator-messages",
                    r#"{"required":"Enter an email","pattern":"Not an email"}"#,
                ),
            ],
        );

        let (valid, failures) = run(&mut doc, input).unwrap();
        assert!(!valid);
        assert_eq!(
            failures,
            vec![
                Some("Enter an email".to_string()),
                None,
                Some("Not an email".to_string()),
            ]
        );
    }

    #[test]
    fn test_non_field_fails_without_callback() {
        let mut doc = Document::new();
        let select = doc.append(doc.root(), "select");
        doc.with_attr(select, "required", "");

        assert_eq!(run(&mut doc, select).unwrap(), (false, vec![]));
    }

    #[test]
    fn test_malformed_messages_abort_even_when_valid() {
        let mut doc = Document::new();
        let input = field(&mut doc, "ok", &[("data-validator-messages", "not json")]);

        assert!(matches!(
            run(&mut doc, input),
            Err(ValidationError::MalformedMessages { .. })
        ));
    }
}
