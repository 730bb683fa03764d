//! Error types
//!
//! Validation *failures* are never errors: they come back as `false` from
//! [`crate::validate`]. The types here cover misconfiguration and host
//! document failures, which abort the call.

/// Failure reported by a [`crate::Dom`] implementation while mutating the tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct DomError(pub String);

impl DomError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that abort a validation call
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A field names a pattern the registry does not know
    #[error("[{0}]: invalid validation pattern")]
    UnknownPattern(String),

    /// The message bundle attribute of a field is not valid JSON
    #[error("malformed message bundle on field `{field}`: {source}")]
    MalformedMessages {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("document operation failed: {0}")]
    Dom(#[from] DomError),
}

/// Errors raised while loading [`crate::Conventions`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid conventions file: {0}")]
    Toml(#[from] toml::de::Error),
}
