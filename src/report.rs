//! Error tracking
//!
//! Request handlers never talk to an error tracker directly. They get an
//! `ErrorReporter` from the server state; when no tracker is configured that
//! is `NoopReporter`.

use serde_json::Value;

/// Prefix marking errors that originated in a visitor's browser
pub const CLIENT_ERROR_PREFIX: &str = "CLIENT ERROR: ";

/// An error as handed to the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedError {
    pub message: String,
    pub stack: Option<String>,
}

impl CapturedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }
}

/// Capability to forward errors to an external tracker
pub trait ErrorReporter: Send + Sync {
    fn capture(&self, error: &CapturedError);
}

/// Drops every error
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ErrorReporter for NoopReporter {
    fn capture(&self, _error: &CapturedError) {}
}

/// Records errors in the application log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn capture(&self, error: &CapturedError) {
        match &error.stack {
            Some(stack) if !stack.is_empty() => {
                tracing::error!(stack = %stack, "{}", error.message)
            }
            _ => tracing::error!("{}", error.message),
        }
    }
}

/// Normalise the `error` field of a client report
///
/// Accepts either a bare string or an object with `message` and optional
/// `stack`; the message is always prefixed with `CLIENT ERROR: `.
pub fn client_error(error: &Value) -> CapturedError {
    let (message, stack) = match error {
        Value::String(message) => (message.clone(), None),
        Value::Object(fields) => {
            let message = match fields.get("message") {
                Some(Value::String(m)) => m.clone(),
                Some(other) => other.to_string(),
                None => "unknown error".to_string(),
            };
            let stack = fields
                .get("stack")
                .and_then(Value::as_str)
                .map(str::to_string);
            (message, stack)
        }
        Value::Null => ("unknown error".to_string(), None),
        other => (other.to_string(), None),
    };

    CapturedError {
        message: format!("{}{}", CLIENT_ERROR_PREFIX, message),
        stack,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_error() {
        let captured = client_error(&json!("boom"));
        assert_eq!(captured.message, "CLIENT ERROR: boom");
        assert_eq!(captured.stack, None);
    }

    #[test]
    fn test_object_error_keeps_stack() {
        let captured = client_error(&json!({"message": "bad", "stack": "at x.js:1"}));
        assert_eq!(captured.message, "CLIENT ERROR: bad");
        assert_eq!(captured.stack.as_deref(), Some("at x.js:1"));
    }

    #[test]
    fn test_object_without_message() {
        let captured = client_error(&json!({"stack": "trace"}));
        assert_eq!(captured.message, "CLIENT ERROR: unknown error");
    }

    #[test]
    fn test_noop_reporter_accepts_anything() {
        NoopReporter.capture(&CapturedError::new("ignored"));
    }
}
