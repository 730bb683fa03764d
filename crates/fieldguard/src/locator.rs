//! Field lookup by identifier within a scope

use crate::config::Conventions;
use crate::dom::{Dom, DomResult};

/// Resolves identifiers to fields below `scope`, keeping the given order
///
/// Each identifier maps to the first element in document order whose name
/// attribute equals it. Identifiers with no match, or whose first match is
/// not an editable text field, are dropped. A lookup the document cannot
/// run is an error.
pub fn resolve<D, S>(
    dom: &D,
    scope: &D::Node,
    identifiers: &[S],
    conventions: &Conventions,
) -> DomResult<Vec<D::Node>>
where
    D: Dom,
    S: AsRef<str>,
{
    let mut fields = Vec::with_capacity(identifiers.len());
    for id in identifiers {
        let first = dom
            .find_by_attribute(scope, &conventions.name_attr, id.as_ref())?
            .into_iter()
            .next();
        if let Some(node) = first.filter(|node| dom.is_field(node)) {
            fields.push(node);
        }
    }
    Ok(fields)
}
