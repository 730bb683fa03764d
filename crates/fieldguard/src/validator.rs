//! Validation entry point
//!
//! One call resets every targeted field, evaluates field rules, checks the
//! equality group and folds everything into a single boolean. Failures are
//! reported to the user through the annotations left in the document.

use tracing::debug;

use crate::annotate::Annotator;
use crate::config::{Conventions, ValidateConfig};
use crate::dom::Dom;
use crate::equality;
use crate::error::ValidationError;
use crate::locator;
use crate::rules;

/// Validator bound to a set of markup conventions
#[derive(Debug, Clone, Default)]
pub struct Validator {
    conventions: Conventions,
}

impl Validator {
    pub fn new(conventions: Conventions) -> Self {
        Self { conventions }
    }

    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Validates the fields named in `config` within `scope`
    ///
    /// Returns `Ok(true)` when every rule and the equality group pass, or
    /// when there was nothing to check. Configuration problems (an unknown
    /// pattern, a malformed message bundle) abort with an error, as does a
    /// field lookup the document cannot run.
    pub fn validate<D: Dom>(
        &self,
        dom: &mut D,
        scope: &D::Node,
        config: &ValidateConfig,
    ) -> Result<bool, ValidationError> {
        let c = &self.conventions;
        let annotator = Annotator::new(c);

        let fields = match config.fields.as_deref() {
            Some(ids) if !ids.is_empty() => locator::resolve(&*dom, scope, ids, c)?,
            _ => Vec::new(),
        };
        let equals = match config.equals.as_deref() {
            Some(ids) if !ids.is_empty() => locator::resolve(&*dom, scope, ids, c)?,
            _ => Vec::new(),
        };
        debug!(
            fields = fields.len(),
            equals = equals.len(),
            "validating"
        );

        // clear everything this call may annotate before annotating anything
        for field in &fields {
            annotator.reset(dom, field)?;
        }
        for field in equals.iter().filter(|f| !fields.contains(f)) {
            annotator.reset(dom, field)?;
        }

        let mut results = Vec::with_capacity(fields.len() + 1);
        for field in &fields {
            let valid = rules::evaluate(dom, field, c, |dom, node, message| {
                annotator.show(dom, node, message).map_err(ValidationError::from)
            })?;
            results.push(valid);
        }

        if !equals.is_empty() {
            results.push(equality::check_and_annotate(dom, &equals, c)?);
        }

        let valid = results.iter().all(|passed| *passed);
        debug!(valid, "validation finished");
        Ok(valid)
    }
}

/// Validates with the default conventions
///
/// # Examples
/// ```
/// use fieldguard::{validate, Document, ValidateConfig};
///
/// let mut doc = Document::new();
/// let form = doc.append(doc.root(), "form");
/// let email = doc.append(form, "input");
/// doc.with_attr(email, "name", "email");
/// doc.with_attr(email, "required", "");
///
/// let config = ValidateConfig::new().fields(["email"]);
/// assert!(!validate(&mut doc, &form, &config).unwrap());
///
/// doc.set_value(email, "someone@example.com");
/// assert!(validate(&mut doc, &form, &config).unwrap());
/// ```
pub fn validate<D: Dom>(
    dom: &mut D,
    scope: &D::Node,
    config: &ValidateConfig,
) -> Result<bool, ValidationError> {
    Validator::default().validate(dom, scope, config)
}
