//! Validation configuration types

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What a single [`crate::validate`] call checks
///
/// Both lists are optional; a missing or empty list skips that phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateConfig {
    /// Identifiers of fields whose rules are evaluated, in order
    #[serde(default)]
    pub fields: Option<Vec<String>>,

    /// Identifiers of fields whose values must all be equal
    #[serde(default)]
    pub equals: Option<Vec<String>>,
}

impl ValidateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn equals<I, S>(mut self, equals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equals = Some(equals.into_iter().map(Into::into).collect());
        self
    }
}

/// Markup and attribute names the validator reads and writes
///
/// Every key is optional when deserialising; missing keys keep their
/// default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    /// Class marking a container that owns a field's error state
    pub group_class: String,

    /// Class toggled on a group container while its field is invalid
    pub group_error_class: String,

    /// Class of the element wrapping a field outside any group
    pub wrapper_class: String,

    pub wrapper_tag: String,

    /// Class of message elements, under a group or inside a wrapper
    pub message_class: String,

    pub message_tag: String,

    /// Attribute identifying a field within its scope
    pub name_attr: String,

    pub required_attr: String,

    pub minlength_attr: String,

    /// Attribute naming a registry pattern
    pub pattern_attr: String,

    /// Attribute holding the JSON message bundle
    pub messages_attr: String,

    /// Attribute on a wrapper remembering the field's original inline style
    pub saved_style_attr: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            group_class: "form-group".to_string(),
            group_error_class: "has-error".to_string(),
            wrapper_class: "invalid".to_string(),
            wrapper_tag: "div".to_string(),
            message_class: "text-invalid".to_string(),
            message_tag: "p".to_string(),
            name_attr: "name".to_string(),
            required_attr: "required".to_string(),
            minlength_attr: "minlength".to_string(),
            pattern_attr: "data-validator-pattern".to_string(),
            messages_attr: "data-validator-messages".to_string(),
            saved_style_attr: "data-validator-style".to_string(),
        }
    }
}

impl Conventions {
    /// Parses conventions from TOML, e.g. a `[validator]` table read by the caller
    ///
    /// # Examples
    /// ```
    /// use fieldguard::Conventions;
    /// let conventions = Conventions::from_toml_str(r#"group_class = "field""#).unwrap();
    /// assert_eq!(conventions.group_class, "field");
    /// assert_eq!(conventions.message_tag, "p");
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}
