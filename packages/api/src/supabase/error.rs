//! Error bodies returned by the hosted backend.
//!
//! Three shapes show up in practice:
//!
//! ```json
//! {"code": 400, "error_code": "invalid_credentials", "msg": "Invalid login credentials"}
//! {"error": "invalid_grant", "error_description": "Invalid login credentials"}
//! {"code": "42P01", "message": "relation \"public.clients\" does not exist", "hint": null}
//! ```
//!
//! The first two come from the auth service, the last from the REST layer.
//! A 5xx answer means the service is down, whatever its body says, and is
//! classified like a connection failure.

use domain::{BackendError, BackendErrorKind};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<Value>,
    error_code: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Classify a non-2xx answer from the backend.
pub fn decode_error(status: u16, body: &str) -> BackendError {
    let error = decode_body(status, body);
    if status >= 500 {
        BackendError {
            kind: BackendErrorKind::Transport,
            ..error
        }
    } else {
        error
    }
}

fn decode_body(status: u16, body: &str) -> BackendError {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        let message = if body.trim().is_empty() {
            format!("backend answered with status {status}")
        } else {
            body.trim().to_string()
        };
        return BackendError::new(None, message);
    };

    // Auth errors put the HTTP status in `code`; only string codes are ours.
    let string_code = match parsed.code {
        Some(Value::String(code)) => Some(code),
        _ => None,
    };
    let code = parsed.error_code.or(string_code).or(parsed.error.clone());
    let message = parsed
        .msg
        .or(parsed.message)
        .or(parsed.error_description)
        .or(parsed.error)
        .unwrap_or_else(|| format!("backend answered with status {status}"));

    BackendError::new(code, message)
}
