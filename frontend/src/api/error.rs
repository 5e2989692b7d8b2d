use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use super::transport::TransportError;

/// Coarse classification used by pages to decide what to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Network,
    Unauthorized,
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Network => "network",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Field name to messages, in the order the server listed them.
pub type FieldErrors = Vec<(String, Vec<String>)>;

/// Failure of an API call, classified from status code and body shape.
/// Every response-derived variant keeps the parsed body.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("validation failed (status {status})")]
    Validation {
        status: u16,
        errors: FieldErrors,
        body: Value,
    },
    #[error("unauthorized (status {status})")]
    Unauthorized { status: u16, body: Value },
    #[error("network error: {0}")]
    Network(String),
    #[error("{detail}")]
    Unknown {
        status: Option<u16>,
        detail: String,
        body: Value,
    },
}

impl ApiError {
    pub fn from_response(status: u16, body: Value) -> Self {
        let errors = field_errors(&body);
        match status {
            401 | 403 => ApiError::Unauthorized { status, body },
            _ if status == 422 || !errors.is_empty() => ApiError::Validation {
                status,
                errors,
                body,
            },
            _ => ApiError::Unknown {
                status: Some(status),
                detail: format!("request failed with status {status}"),
                body,
            },
        }
    }

    pub fn unexpected(detail: impl Into<String>) -> Self {
        ApiError::Unknown {
            status: None,
            detail: detail.into(),
            body: Value::Null,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation { status, .. } | ApiError::Unauthorized { status, .. } => {
                Some(*status)
            }
            ApiError::Unknown { status, .. } => *status,
            ApiError::Network(_) => None,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Validation { body, .. }
            | ApiError::Unauthorized { body, .. }
            | ApiError::Unknown { body, .. } => Some(body),
            ApiError::Network(_) => None,
        }
    }

    /// The server's top-level `message`, if any.
    pub fn message(&self) -> Option<&str> {
        self.body()?
            .get("message")?
            .as_str()
            .filter(|m| !m.is_empty())
    }

    pub fn first_field_error(&self) -> Option<&str> {
        match self {
            ApiError::Validation { errors, .. } => errors
                .iter()
                .find_map(|(_, messages)| messages.first())
                .map(String::as_str),
            _ => None,
        }
    }

    /// First validation message, else the server message, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.first_field_error()
            .or_else(|| self.message())
            .unwrap_or(fallback)
            .to_string()
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Network(err.to_string())
    }
}

fn field_errors(body: &Value) -> FieldErrors {
    let Some(errors) = body.get("errors").and_then(Value::as_object) else {
        return Vec::new();
    };
    errors.iter().map(|(field, messages)| (field.clone(), messages_of(messages))).collect()
}

fn messages_of(value: &Value) -> Vec<String> {
    match value {
        Value::String(message) => vec![message.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Substitutes an empty object when the body is not JSON.
pub(crate) fn parse_body(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::Object(Map::new()))
}
