//! Field attribute surface
//!
//! A [`Field`] is a snapshot of everything the rule evaluator needs from an
//! editable element: its value, the declared rules and the optional message
//! bundle. It is read fresh on every call and never cached.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::config::Conventions;
use crate::dom::Dom;
use crate::error::ValidationError;

/// Rule kinds a message bundle can carry text for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MessageKind {
    Required,
    MinLength,
    Pattern,
    Equals,
}

impl MessageKind {
    pub const ALL: [MessageKind; 4] = [
        MessageKind::Required,
        MessageKind::MinLength,
        MessageKind::Pattern,
        MessageKind::Equals,
    ];

    /// Key of this kind inside the JSON bundle
    pub fn key(&self) -> &'static str {
        match self {
            MessageKind::Required => "required",
            MessageKind::MinLength => "minlength",
            MessageKind::Pattern => "pattern",
            MessageKind::Equals => "equals",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Custom messages declared on a field
///
/// Only non-empty string entries count; anything else in the bundle is
/// ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages {
    entries: BTreeMap<MessageKind, String>,
}

impl Messages {
    /// Parses the bundle attribute; `field` only names the field in errors
    pub fn parse(field: &str, source: &str) -> Result<Self, ValidationError> {
        let value: Value =
            serde_json::from_str(source).map_err(|source| ValidationError::MalformedMessages {
                field: field.to_string(),
                source,
            })?;

        let mut entries = BTreeMap::new();
        if let Value::Object(map) = value {
            for kind in MessageKind::ALL {
                if let Some(Value::String(text)) = map.get(kind.key()) {
                    if !text.is_empty() {
                        entries.insert(kind, text.clone());
                    }
                }
            }
        }
        Ok(Self { entries })
    }

    pub fn get(&self, kind: MessageKind) -> Option<&str> {
        self.entries.get(&kind).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One constraint a field declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    /// Raw attribute text; read as a number when checked
    MinLength(String),
    /// Registry pattern name
    Pattern(String),
}

impl Rule {
    pub fn kind(&self) -> MessageKind {
        match self {
            Rule::Required => MessageKind::Required,
            Rule::MinLength(_) => MessageKind::MinLength,
            Rule::Pattern(_) => MessageKind::Pattern,
        }
    }
}

/// Snapshot of an editable element
#[derive(Debug, Clone)]
pub struct Field<N> {
    pub node: N,
    /// Identifier, used in error reports only
    pub name: String,
    pub value: String,
    pub required: bool,
    pub min_length: Option<String>,
    pub pattern: Option<String>,
    /// `None` when the element carries no bundle attribute at all
    pub messages: Option<Messages>,
}

impl<N: Clone> Field<N> {
    /// Reads a field from the document
    ///
    /// Returns `Ok(None)` for elements that are not editable text fields.
    pub fn read<D>(
        dom: &D,
        node: &N,
        conventions: &Conventions,
    ) -> Result<Option<Self>, ValidationError>
    where
        D: Dom<Node = N>,
    {
        if !dom.is_field(node) {
            return Ok(None);
        }

        let name = dom.attribute(node, &conventions.name_attr).unwrap_or_default();
        let messages = dom
            .attribute(node, &conventions.messages_attr)
            .map(|source| Messages::parse(&name, &source))
            .transpose()?;

        Ok(Some(Self {
            node: node.clone(),
            value: dom.value(node),
            required: dom.has_attribute(node, &conventions.required_attr),
            min_length: dom
                .attribute(node, &conventions.minlength_attr)
                .filter(|text| !text.is_empty()),
            pattern: dom
                .attribute(node, &conventions.pattern_attr)
                .filter(|text| !text.is_empty()),
            messages,
            name,
        }))
    }

    /// Declared rules in evaluation order: required, minlength, pattern
    pub fn rules(&self) -> Vec<Rule> {
        let mut rules = Vec::with_capacity(3);
        if self.required {
            rules.push(Rule::Required);
        }
        if let Some(min) = &self.min_length {
            rules.push(Rule::MinLength(min.clone()));
        }
        if let Some(pattern) = &self.pattern {
            rules.push(Rule::Pattern(pattern.clone()));
        }
        rules
    }

    pub fn message(&self, kind: MessageKind) -> Option<&str> {
        self.messages.as_ref().and_then(|m| m.get(kind))
    }
}
