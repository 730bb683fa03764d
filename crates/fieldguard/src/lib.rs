//! # fieldguard
//!
//! Form field validation that annotates the document it runs on.
//!
//! Given a scope element and a [`ValidateConfig`], [`validate`] checks each
//! named field's declared rules (`required`, `minlength`, and a named
//! [`Pattern`]), checks that an equality group shares one value, and leaves
//! visible error markup next to every failing field. Calling it again first
//! clears what the previous call left behind, so repeated validation never
//! piles up stale errors.
//!
//! The engine works on anything implementing [`Dom`]. [`Document`] is an
//! in-memory tree for servers and tests; the `fieldguard-wasm` crate
//! provides the browser implementation.
//!
//! ## Example
//!
//! ```rust
//! use fieldguard::{validate, Document, ValidateConfig};
//!
//! let mut doc = Document::new();
//! let form = doc.append(doc.root(), "form");
//! let email = doc.append(form, "input");
//! doc.with_attr(email, "name", "email");
//! doc.with_attr(email, "data-validator-pattern", "email");
//! doc.with_attr(email, "data-validator-messages", r#"{"pattern":"Enter a valid email"}"#);
//! doc.set_value(email, "not-an-email");
//!
//! let config = ValidateConfig::new().fields(["email"]);
//! assert!(!validate(&mut doc, &form, &config).unwrap());
//! assert!(doc.render(form).contains("Enter a valid email"));
//! ```

pub mod annotate;
pub mod config;
pub mod dom;
pub mod equality;
pub mod error;
pub mod field;
pub mod locator;
pub mod patterns;
pub mod rules;
pub mod validator;

pub use annotate::{Annotator, Strategy};
pub use config::{Conventions, ValidateConfig};
pub use dom::memory::{Document, NodeId};
pub use dom::{Dom, DomResult};
pub use equality::EqualityOutcome;
pub use error::{ConfigError, DomError, ValidationError};
pub use field::{Field, MessageKind, Messages, Rule};
pub use patterns::Pattern;
pub use validator::{validate, Validator};
