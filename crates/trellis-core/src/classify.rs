//! Failure classification.
//!
//! [`classify`] is the single chokepoint between heterogeneous transport and
//! server failures and the closed [`ErrorCode`] taxonomy. It is total: any
//! input, including missing fields and junk payloads, resolves to a member of
//! the closed set. It never panics and never returns anything open-ended, so a
//! single malformed error payload cannot take down an unrelated screen.

use crate::errors::ErrorCode;
use serde_json::Value;

/// Boundary shape the classifier consumes.
///
/// Transport adapters build one of these from whatever the failure actually
/// looked like: an HTTP response, a timeout, an aborted request. A failure with
/// no reachable HTTP status (`status: None`) is a connectivity problem by
/// definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFailure {
    /// HTTP status, when one was reachable.
    pub status: Option<u16>,
    /// Server error-code string, when the payload carried one.
    pub code: Option<String>,
    /// Human-readable message, when present.
    pub message: Option<String>,
}

impl RawFailure {
    /// A transport-level failure where no HTTP status was reachable
    /// (DNS failure, timeout, abort).
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: None,
            message: Some(message.into()),
        }
    }

    /// A failure with an HTTP status and no recognizable payload.
    pub fn status(status: u16) -> Self {
        Self {
            status: Some(status),
            code: None,
            message: None,
        }
    }

    /// Extract a failure from an arbitrary JSON payload.
    ///
    /// Tolerates every shape the legacy call sites produced: the code may sit
    /// at `error.code` or top-level `code`, the message at `error.message` or
    /// `message`. Anything absent stays `None`.
    pub fn from_value(status: Option<u16>, value: &Value) -> Self {
        let error = value.get("error").unwrap_or(value);
        let code = error
            .get("code")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned);
        Self {
            status,
            code,
            message,
        }
    }

    /// Attach a server error-code string.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Map a raw failure into the closed taxonomy.
///
/// A recognized wire `code` string is honored even when the status alone would
/// be ambiguous; the server is the authority on its own error vocabulary.
/// Status-based mapping is the fallback:
///
/// - no status reachable → `NetworkError`
/// - 401 → `AuthRequired`, 403 → `FacilityAccessDenied`, 404 → `NotFound`
/// - 409 carrying the confirmation marker → `UserConfirmationRequired`;
///   a bare 409 is `Unknown` (no safe retry semantics to offer)
/// - 400/422 → `ValidationError`
/// - 5xx → `ServerError`
/// - everything else → `Unknown`
pub fn classify(raw: &RawFailure) -> ErrorCode {
    if let Some(code) = raw.code.as_deref().and_then(ErrorCode::from_wire) {
        return code;
    }

    match raw.status {
        None => ErrorCode::NetworkError,
        Some(401) => ErrorCode::AuthRequired,
        Some(403) => ErrorCode::FacilityAccessDenied,
        Some(404) => ErrorCode::NotFound,
        Some(400) | Some(422) => ErrorCode::ValidationError,
        Some(status) if (500..600).contains(&status) => ErrorCode::ServerError,
        Some(_) => ErrorCode::Unknown,
    }
}
