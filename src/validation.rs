//! Declarative presence checks for request bodies.

use serde_json::{Map, Value};

use crate::error::ApiError;

/// Body key holding the user's name.
pub const NAME_FIELD: &str = "name";
/// Body key holding the user's email.
pub const EMAIL_FIELD: &str = "email";

/// A single field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Body key the rule applies to.
    pub field: &'static str,
    /// Whether the field must carry a truthy value.
    pub required: bool,
}

impl FieldRule {
    /// A field that must be present.
    pub const fn required(field: &'static str) -> Self {
        Self {
            field,
            required: true,
        }
    }

    /// A field that may be omitted.
    pub const fn optional(field: &'static str) -> Self {
        Self {
            field,
            required: false,
        }
    }
}

/// Rules for `POST /api/users`.
pub const CREATE_USER_SCHEMA: &[FieldRule] =
    &[FieldRule::required(NAME_FIELD), FieldRule::required(EMAIL_FIELD)];

/// Loose truthiness: `null`, `false`, `0` and `""` are falsy, everything
/// else (including empty arrays and objects) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A body that passed its schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBody(Map<String, Value>);

impl ValidatedBody {
    /// Move a field out of the body. Absent optional fields come back as `null`.
    pub fn take(&mut self, field: &str) -> Value {
        self.0.remove(field).unwrap_or(Value::Null)
    }
}

/// Check `body` against `schema`, handing the body back on success.
///
/// Any failing rule yields [`ApiError::Validation`].
pub fn validate(
    body: Map<String, Value>,
    schema: &[FieldRule],
) -> Result<ValidatedBody, ApiError> {
    let missing = schema
        .iter()
        .filter(|rule| rule.required)
        .find(|rule| !body.get(rule.field).is_some_and(is_truthy));

    match missing {
        Some(rule) => {
            tracing::debug!(field = rule.field, "required field missing");
            Err(ApiError::Validation)
        }
        None => Ok(ValidatedBody(body)),
    }
}
