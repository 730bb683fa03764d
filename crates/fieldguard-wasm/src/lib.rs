//! fieldguard WASM
//!
//! WebAssembly bindings that run fieldguard validation directly against
//! the page's DOM.
//!
//! # Example (JavaScript)
//! ```javascript
//! import init, { validate } from './fieldguard_wasm.js';
//!
//! await init();
//! const form = document.querySelector('#signup');
//! const ok = validate(form, { fields: ['email', 'password'], equals: ['password', 'confirm'] });
//! ```

pub mod web;

use fieldguard::{Conventions, Pattern, ValidateConfig, Validator};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Node};

pub use web::WebDom;

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js_error(message: String) -> JsValue {
    web_sys::console::error_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

/// `undefined` and `null` read as the type's default
fn from_js<T: DeserializeOwned + Default>(value: JsValue, what: &str) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| to_js_error(format!("Failed to parse {}: {}", what, e)))
}

/// Validate the fields below `scope`
///
/// `config` is `{ fields?: string[], equals?: string[] }`. Returns whether
/// everything passed; failing fields are annotated in the page. Throws on
/// configuration errors such as an unknown pattern name, and when a field
/// lookup cannot run in the page.
#[wasm_bindgen]
pub fn validate(scope: &Element, config: JsValue) -> Result<bool, JsValue> {
    validate_with(scope, config, JsValue::UNDEFINED)
}

/// Like `validate`, with custom markup conventions
///
/// `conventions` takes the same snake_case keys as the Rust `Conventions`
/// type; missing keys keep their defaults.
#[wasm_bindgen(js_name = validateWith)]
pub fn validate_with(
    scope: &Element,
    config: JsValue,
    conventions: JsValue,
) -> Result<bool, JsValue> {
    let config: ValidateConfig = from_js(config, "config")?;
    let conventions: Conventions = from_js(conventions, "conventions")?;

    let scope: &Node = scope.as_ref();
    let mut dom = WebDom::for_node(scope)
        .ok_or_else(|| to_js_error("scope is not attached to a document".to_string()))?;

    Validator::new(conventions)
        .validate(&mut dom, scope, &config)
        .map_err(|e| to_js_error(e.to_string()))
}

/// Quick check of a value against a named pattern
#[wasm_bindgen(js_name = matchesPattern)]
pub fn matches_pattern(name: &str, value: &str) -> Result<bool, JsValue> {
    Pattern::lookup(name)
        .map(|pattern| pattern.matches(value))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
