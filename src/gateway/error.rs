//! Failure classification for remote API responses.
//!
//! Every non-2xx response (and every 2xx response whose body cannot be decoded)
//! becomes a [`GatewayError`] value. These errors are data: the cache stores
//! them on entries and the mutation coordinator turns them into notices. They
//! are never propagated with `?` past those components.

use super::http::HttpResponse;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::fmt;
use thiserror::Error;

/// Coarse failure category, derived from the transport status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request never got an HTTP answer.
    Network,
    /// 401 or 403: missing, expired or insufficient bearer token.
    Authorization,
    /// 400, 409 or 422: the server rejected the input.
    Validation,
    /// 404: the addressed item does not exist.
    NotFound,
    /// 5xx, unexpected statuses, or undecodable bodies.
    Unknown,
}

impl ErrorKind {
    /// Maps an HTTP status to a kind. Only meaningful for non-2xx statuses.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            0 => Self::Network,
            401 | 403 => Self::Authorization,
            400 | 409 | 422 => Self::Validation,
            404 => Self::NotFound,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Network => "network unreachable",
            Self::Authorization => "not authorized",
            Self::Validation => "validation failed",
            Self::NotFound => "not found",
            Self::Unknown => "unexpected error",
        })
    }
}

/// A single field-level validation complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// A classified remote failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct GatewayError {
    pub kind: ErrorKind,
    /// HTTP status, `None` when no response was received or the request was
    /// refused before sending.
    pub status: Option<u16>,
    pub message: String,
    pub field_errors: Vec<FieldError>,
}

impl GatewayError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    /// The error used when a mutation targets a read-only collection.
    #[must_use]
    pub fn read_only(collection: &str) -> Self {
        Self::new(ErrorKind::Validation, format!("{collection} are read-only"))
    }

    /// Classifies a non-2xx response.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        let kind = ErrorKind::from_status(response.status);
        let parsed: Option<JsonValue> = serde_json::from_slice(&response.body).ok();

        let message = parsed
            .as_ref()
            .and_then(extract_message)
            .or_else(|| {
                let text = String::from_utf8_lossy(&response.body).trim().to_string();
                (!text.is_empty() && parsed.is_none()).then_some(text)
            })
            .unwrap_or_else(|| match response.status {
                0 => "no response from server".to_string(),
                status => format!("request failed with status {status}"),
            });

        let field_errors = if kind == ErrorKind::Validation {
            parsed.as_ref().map(extract_field_errors).unwrap_or_default()
        } else {
            Vec::new()
        };

        Self {
            kind,
            status: (response.status != 0).then_some(response.status),
            message,
            field_errors,
        }
    }

    /// Human-readable summary including field errors, for notices.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.field_errors.is_empty() {
            return self.message.clone();
        }
        let fields = self
            .field_errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        format!("{} ({fields})", self.message)
    }
}

/// Returns the body on 2xx, the classified error otherwise.
///
/// # Errors
///
/// Returns a [`GatewayError`] for any non-2xx status.
pub fn check(response: &HttpResponse) -> Result<&[u8], GatewayError> {
    if response.is_success() {
        Ok(&response.body)
    } else {
        Err(GatewayError::from_response(response))
    }
}

/// Checks the status and decodes the JSON body.
///
/// # Errors
///
/// Returns the classified error for non-2xx statuses, or an
/// [`ErrorKind::Unknown`] error when a 2xx body does not match `T`.
pub fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, GatewayError> {
    let body = check(response)?;
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(request = %response.id, error = %e, "response body did not match expected shape");
        let mut error = GatewayError::new(ErrorKind::Unknown, format!("unexpected response: {e}"));
        error.status = Some(response.status);
        error
    })
}

fn extract_message(body: &JsonValue) -> Option<String> {
    ["message", "status_message", "error"]
        .iter()
        .find_map(|field| body.get(field).and_then(JsonValue::as_str))
        .map(str::to_string)
}

/// Collects field errors from the shapes the APIs use:
/// `{"errors": [{"field"|"path": .., "message"|"msg": ..}]}`,
/// `{"errors": {"title": "too short"}}` and
/// `{"validation": {"body": {"message": ..}}}`.
fn extract_field_errors(body: &JsonValue) -> Vec<FieldError> {
    let Some(errors) = body.get("errors").or_else(|| body.get("validation")) else {
        return Vec::new();
    };

    match errors {
        JsonValue::Array(entries) => entries
            .iter()
            .filter_map(|entry| {
                let field = ["field", "path", "param"]
                    .iter()
                    .find_map(|k| entry.get(k))
                    .map(json_to_text)?;
                let message = ["message", "msg"]
                    .iter()
                    .find_map(|k| entry.get(k))
                    .map_or_else(|| "invalid".to_string(), json_to_text);
                Some(FieldError { field, message })
            })
            .collect(),
        JsonValue::Object(map) => map
            .iter()
            .map(|(field, value)| FieldError {
                field: field.clone(),
                message: value
                    .get("message")
                    .map_or_else(|| json_to_text(value), json_to_text),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn json_to_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(parts) => parts.iter().map(json_to_text).collect::<Vec<_>>().join("."),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::http::RequestId;
    use rstest::rstest;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            id: RequestId::new(1),
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[rstest]
    #[case(0, ErrorKind::Network)]
    #[case(401, ErrorKind::Authorization)]
    #[case(403, ErrorKind::Authorization)]
    #[case(400, ErrorKind::Validation)]
    #[case(422, ErrorKind::Validation)]
    #[case(404, ErrorKind::NotFound)]
    #[case(500, ErrorKind::Unknown)]
    #[case(503, ErrorKind::Unknown)]
    #[case(418, ErrorKind::Unknown)]
    fn classifies_by_status(#[case] status: u16, #[case] expected: ErrorKind) {
        assert_eq!(GatewayError::from_response(&response(status, "")).kind, expected);
    }

    #[test]
    fn uses_server_message_when_present() {
        let error = GatewayError::from_response(&response(404, r#"{"message":"Note not found"}"#));
        assert_eq!(error.message, "Note not found");
        assert_eq!(error.status, Some(404));
        assert_eq!(error.to_string(), "not found: Note not found");
    }

    #[test]
    fn uses_tmdb_status_message() {
        let error = GatewayError::from_response(&response(
            401,
            r#"{"status_code":7,"status_message":"Invalid API key"}"#,
        ));
        assert_eq!(error.kind, ErrorKind::Authorization);
        assert_eq!(error.message, "Invalid API key");
    }

    #[test]
    fn network_failure_keeps_host_text() {
        let error = GatewayError::from_response(&response(0, "connection refused"));
        assert_eq!(error.kind, ErrorKind::Network);
        assert_eq!(error.status, None);
        assert_eq!(error.message, "connection refused");
    }

    #[test]
    fn collects_field_errors_from_array_and_object() {
        let error = GatewayError::from_response(&response(
            400,
            r#"{"message":"Validation failed","errors":[{"path":["title"],"message":"too short"}]}"#,
        ));
        assert_eq!(
            error.field_errors,
            vec![FieldError { field: "title".into(), message: "too short".into() }]
        );
        assert_eq!(error.describe(), "Validation failed (title: too short)");

        let error = GatewayError::from_response(&response(
            422,
            r#"{"validation":{"tag":{"message":"invalid tag"}}}"#,
        ));
        assert_eq!(error.field_errors[0].field, "tag");
        assert_eq!(error.field_errors[0].message, "invalid tag");
    }

    #[test]
    fn undecodable_success_is_unknown() {
        let result: Result<Vec<u32>, _> = decode(&response(200, "{not json"));
        let error = result.unwrap_err();
        assert_eq!(error.kind, ErrorKind::Unknown);
        assert!(error.message.starts_with("unexpected response"));
    }
}
