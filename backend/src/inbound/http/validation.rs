//! Shared validation helpers for inbound HTTP adapters.
//!
//! All request-shape failures funnel through these helpers so every 400
//! response carries the same `details` shape: the offending field and a
//! stable machine-readable code.

use serde_json::json;

use crate::domain::Error;

/// Build the error for a field that is absent from the request.
pub(crate) fn missing_field_error(field: &'static str) -> Error {
    Error::invalid_request(format!("{field} is required")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

/// Build the error for a field whose value failed validation.
pub(crate) fn invalid_field_error(
    field: &'static str,
    code: &'static str,
    message: impl Into<String>,
    value: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "value": value.into(),
        "code": code,
    }))
}
