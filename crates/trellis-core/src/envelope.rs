//! Normalized remote-operation envelope.
//!
//! Every remote call outcome is normalized into [`OperationEnvelope`] at the
//! transport boundary before it enters the core. The core itself works on
//! [`Outcome`], the tagged form, so no component ever branches on "does this
//! object happen to have a `success` field".

use crate::classify::{classify, RawFailure};
use crate::errors::ErrorCode;
use crate::identifiers::{FacilityId, GrowId, RequestId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error half of the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    /// Classified failure code. Always a member of the closed set.
    pub code: ErrorCode,
    /// Human-readable message from the server or transport.
    pub message: String,
    /// Server-assigned request id, when the failure carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
}

impl OperationError {
    /// Build an error from a classified raw failure.
    pub fn from_raw(raw: &RawFailure) -> Self {
        Self {
            code: classify(raw),
            message: raw
                .message
                .clone()
                .unwrap_or_else(|| "operation failed".to_string()),
            request_id: None,
        }
    }

    /// Build an error with an explicit code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            request_id: None,
        }
    }
}

/// Wire mirror of every remote call outcome.
///
/// `success`, `data`, and `error` arrive as independent fields, so
/// inconsistent combinations are representable. [`into_outcome`] is the only
/// sanctioned way to read one; it resolves inconsistencies instead of
/// panicking.
///
/// [`into_outcome`]: OperationEnvelope::into_outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationEnvelope<T> {
    /// Whether the server reports the operation as applied.
    pub success: bool,
    /// Result payload on success.
    pub data: Option<T>,
    /// Failure detail when `success` is false.
    pub error: Option<OperationError>,
}

/// Tagged form of an envelope, after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The operation was applied; `data` is the server's result payload.
    Success {
        /// Result payload; `None` for mutations that return no body.
        data: Option<T>,
    },
    /// The operation failed with a classified error.
    Failure {
        /// Classified failure detail.
        error: OperationError,
    },
}

impl<T> OperationEnvelope<T> {
    /// A successful envelope carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A successful envelope with no body.
    pub fn success_empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    /// A failed envelope carrying `error`.
    pub fn failure(error: OperationError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    /// The classified error code, if this envelope is a failure.
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error.as_ref().map(|e| e.code)
    }

    /// Normalize into the tagged form.
    ///
    /// Inconsistent combinations degrade to failures rather than panics:
    /// `success: true` alongside an error is treated as that error, and
    /// `success: false` with no error becomes `Unknown`.
    pub fn into_outcome(self) -> Outcome<T> {
        match (self.success, self.error) {
            (true, None) => Outcome::Success { data: self.data },
            (_, Some(error)) => Outcome::Failure { error },
            (false, None) => Outcome::Failure {
                error: OperationError::new(
                    ErrorCode::Unknown,
                    "server reported failure with no error detail",
                ),
            },
        }
    }
}

impl<T> Outcome<T> {
    /// Returns `true` for a success outcome.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// The classified error, if this is a failure.
    pub fn error(&self) -> Option<&OperationError> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { error } => Some(error),
        }
    }
}

/// Context block carried on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Facility the request operates on, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<FacilityId>,
    /// Grow the request operates on, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grow_id: Option<GrowId>,
}

/// Wire shape of an outgoing remote call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRequest {
    /// Tool namespace, e.g. `"harvest"`.
    pub tool: String,
    /// Function within the tool, e.g. `"estimate_harvest_window"`.
    #[serde(rename = "fn")]
    pub fn_name: String,
    /// Call arguments. The confirmation flag is injected here for phase two.
    pub args: Value,
    /// Context block.
    pub context: RequestContext,
}

impl OperationRequest {
    /// Build a request with empty args.
    pub fn new(tool: impl Into<String>, fn_name: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            fn_name: fn_name.into(),
            args: Value::Object(serde_json::Map::new()),
            context: RequestContext::default(),
        }
    }

    /// Set the request arguments.
    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }

    /// Set the request context block.
    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    /// Re-issue form of the identical call carrying `args.confirm = true`.
    ///
    /// Used for phase two of the confirmation protocol. Non-object args are
    /// wrapped so the flag always has somewhere to live.
    pub fn confirmed(mut self) -> Self {
        match &mut self.args {
            Value::Object(map) => {
                map.insert("confirm".to_string(), Value::Bool(true));
            }
            other => {
                let mut map = serde_json::Map::new();
                map.insert("payload".to_string(), other.take());
                map.insert("confirm".to_string(), Value::Bool(true));
                self.args = Value::Object(map);
            }
        }
        self
    }
}
