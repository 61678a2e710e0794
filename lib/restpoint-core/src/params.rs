//! Named parameters for URL templates.

use serde_json::Value;

use crate::{Error, Result};

/// Parameters handed to the URL template compiler.
///
/// Holds an optional JSON value so that an invalid (non-object) value can be
/// carried into request construction and surface as a deferred failure rather
/// than a panic. Build one from `()` (no params) or any [`Value`]:
///
/// ```
/// use restpoint_core::Params;
/// use serde_json::json;
///
/// let none = Params::from(());
/// let some = Params::from(json!({ "username": "alice" }));
/// assert!(some.fields().expect("object").is_some());
/// assert!(none.fields().expect("object").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Params(Option<Value>);

impl Params {
    /// No parameters.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// The parameter object, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] when a value is present but is not a
    /// JSON object.
    pub fn fields(&self) -> Result<Option<&serde_json::Map<String, Value>>> {
        match &self.0 {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(other) => Err(Error::InvalidParams(json_type(other))),
        }
    }

    /// Render the named field as a path segment.
    ///
    /// Strings are used verbatim, numbers and booleans through their display
    /// form. Missing, null, and non-scalar fields yield `None`.
    #[must_use]
    pub fn segment(&self, name: &str) -> Option<String> {
        let Some(Value::Object(map)) = &self.0 else {
            return None;
        };
        match map.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl From<()> for Params {
    fn from((): ()) -> Self {
        Self::none()
    }
}

impl From<Value> for Params {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::none(),
            other => Self(Some(other)),
        }
    }
}

impl From<serde_json::Map<String, Value>> for Params {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(Some(Value::Object(map)))
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
