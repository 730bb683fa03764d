// Validates a small signup form twice and prints the markup after each pass.
//
// Run with: cargo run -p fieldguard --example signup

use fieldguard::{Document, ValidateConfig, Validator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let mut doc = Document::new();
    let form = doc.append(doc.root(), "form");

    let group = doc.append(form, "div");
    doc.with_attr(group, "class", "form-group");
    let email = doc.append(group, "input");
    doc.with_attr(email, "name", "email");
    doc.with_attr(email, "required", "");
    doc.with_attr(email, "data-validator-pattern", "email");
    doc.with_attr(
        email,
        "data-validator-messages",
        r#"{"required":"Email is required","pattern":"Enter a valid email"}"#,
    );

    let password = doc.append(form, "input");
    doc.with_attr(password, "name", "password");
    doc.with_attr(password, "minlength", "8");
    doc.with_attr(password, "data-validator-messages", r#"{"minlength":"At least 8 characters"}"#);

    let confirm = doc.append(form, "input");
    doc.with_attr(confirm, "name", "confirm");
    doc.with_attr(confirm, "data-validator-messages", r#"{"equals":"Passwords do not match"}"#);

    let config = ValidateConfig::new()
        .fields(["email", "password"])
        .equals(["password", "confirm"]);
    let validator = Validator::default();

    doc.set_value(email, "someone@");
    doc.set_value(password, "short");
    doc.set_value(confirm, "shorter");
    let valid = validator.validate(&mut doc, &form, &config)?;
    println!("first pass valid={valid}\n{}\n", doc.render(form));

    doc.set_value(email, "someone@example.com");
    doc.set_value(password, "long enough");
    doc.set_value(confirm, "long enough");
    let valid = validator.validate(&mut doc, &form, &config)?;
    println!("second pass valid={valid}\n{}", doc.render(form));

    Ok(())
}
