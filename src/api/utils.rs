//! API utility functions
//!
//! Pure, stateless helpers for request parsing and response headers, kept out of
//! services.rs so they can be unit tested.

use serde_json::Value;
use std::path::Path;

use super::models::{HashQueryRequest, REQUIRED_KEYS};
use crate::api::error::ApiError;

/// Parses a request body in three steps, each with its own failure:
/// not JSON (or not an object), a required key missing, a key of the wrong type.
pub fn parse_query_request(body: &[u8]) -> Result<HashQueryRequest, ApiError> {
    let value: Value = serde_json::from_slice(body)?;

    let Value::Object(fields) = &value else {
        return Err(ApiError::MalformedPayload(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    };

    if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !fields.contains_key(**key)) {
        return Err(ApiError::MissingField(*missing));
    }

    Ok(serde_json::from_value(value)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// File name component of a report path; the directory part is ignored.
pub fn report_file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// `attachment; filename="..."` with characters that cannot appear in a quoted
/// header value replaced by `_`. Names that needed replacing also get an RFC 5987
/// `filename*` carrying the exact UTF-8 name.
pub fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    if safe == file_name {
        format!("attachment; filename=\"{safe}\"")
    } else {
        format!(
            "attachment; filename=\"{safe}\"; filename*=UTF-8''{}",
            urlencoding::encode(file_name)
        )
    }
}
