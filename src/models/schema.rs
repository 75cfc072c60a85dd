use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

/// A response body the admin client accepts from the proxy.
///
/// Parsing is three steps: serde shape, `validator` field rules, then [`Schema::check_shape`]
/// for the things neither of those covers (literal `object` tags, unique list ids).
pub trait Schema: DeserializeOwned + Validate {
    fn check_shape(&self) -> Result<(), String> {
        Ok(())
    }

    /// Identifier that must be unique within a list, if the resource has one.
    fn identity(&self) -> Option<String> {
        None
    }
}

pub fn expect_object(actual: &str, expected: &str) -> Result<(), String> {
    if actual == expected {
        Ok(())
    } else {
        Err(format!("expected object \"{expected}\", got \"{actual}\""))
    }
}

/// Message of the first failing field, checking `field_order` first and then any other field.
pub fn first_validation_message(errors: &ValidationErrors, field_order: &[&str]) -> Option<String> {
    let field_errors = errors.field_errors();
    field_order
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .chain(field_errors.values())
        .flat_map(|errors| errors.iter())
        .find_map(|error| error.message.as_ref().map(|message| message.to_string()))
}

pub fn parse<S: Schema>(body: Value) -> Result<S, String> {
    let parsed: S = serde_json::from_value(body).map_err(|e| format!("unexpected response shape: {e}"))?;
    parsed.validate().map_err(|e| format!("invalid response field: {e}"))?;
    parsed.check_shape()?;
    Ok(parsed)
}
