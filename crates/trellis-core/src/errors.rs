//! Unified error handling for the Trellis core.
//!
//! Two layers live here. [`ErrorCode`] is the closed taxonomy every remote
//! failure is classified into; downstream routing is an exhaustive match over
//! it, never string inspection. [`TrellisError`] is the core's own error type
//! for the few operations that can fail locally.

use serde::{Deserialize, Serialize};

/// Closed set of remote-failure codes.
///
/// Every failure that enters the core carries exactly one of these. The set is
/// closed on purpose: routing (`route`) and escalation (`is_global`) are
/// exhaustive matches with no default-case guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No HTTP status was reachable: DNS failure, timeout, abort.
    NetworkError,
    /// Session is missing or expired (HTTP 401).
    AuthRequired,
    /// The session may not act on this facility (HTTP 403).
    FacilityAccessDenied,
    /// The server rejected the request payload (HTTP 400/422).
    ValidationError,
    /// The mutation needs an explicit second acknowledgment before it runs.
    UserConfirmationRequired,
    /// The target record does not exist (HTTP 404).
    NotFound,
    /// The server failed internally (HTTP 5xx).
    ServerError,
    /// Anything the classifier does not recognize.
    Unknown,
}

/// Where the surrounding UI must send a failure with a given code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorRoute {
    /// Force logout and redirect to login.
    ForceLogout,
    /// Show a "no access" state; do not navigate away.
    AccessDeniedBanner,
    /// Prompt the user and offer a confirmed retry.
    ConfirmationPrompt,
    /// Inline error display local to the acting component.
    InlineDisplay,
}

impl ErrorCode {
    /// Deterministic routing target for this code.
    pub fn route(self) -> ErrorRoute {
        match self {
            ErrorCode::AuthRequired => ErrorRoute::ForceLogout,
            ErrorCode::FacilityAccessDenied => ErrorRoute::AccessDeniedBanner,
            ErrorCode::UserConfirmationRequired => ErrorRoute::ConfirmationPrompt,
            ErrorCode::NetworkError
            | ErrorCode::ValidationError
            | ErrorCode::NotFound
            | ErrorCode::ServerError
            | ErrorCode::Unknown => ErrorRoute::InlineDisplay,
        }
    }

    /// Codes that invalidate the premise of the current screen and escalate to
    /// a session-level handler instead of the invoking component.
    pub fn is_global(self) -> bool {
        matches!(
            self,
            ErrorCode::AuthRequired | ErrorCode::FacilityAccessDenied
        )
    }

    /// Codes the calling component can recover from by re-dispatching.
    pub fn is_recoverable(self) -> bool {
        matches!(self, ErrorCode::UserConfirmationRequired)
    }

    /// Wire string for this code, e.g. `"USER_CONFIRMATION_REQUIRED"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::AuthRequired => "AUTH_REQUIRED",
            ErrorCode::FacilityAccessDenied => "FACILITY_ACCESS_DENIED",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::UserConfirmationRequired => "USER_CONFIRMATION_REQUIRED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ServerError => "SERVER_ERROR",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }

    /// Parse a wire string into a code. Unrecognized strings yield `None`;
    /// callers fall back to status-based classification.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "NETWORK_ERROR" => Some(ErrorCode::NetworkError),
            "AUTH_REQUIRED" => Some(ErrorCode::AuthRequired),
            "FACILITY_ACCESS_DENIED" => Some(ErrorCode::FacilityAccessDenied),
            "VALIDATION_ERROR" => Some(ErrorCode::ValidationError),
            "USER_CONFIRMATION_REQUIRED" => Some(ErrorCode::UserConfirmationRequired),
            "NOT_FOUND" => Some(ErrorCode::NotFound),
            "SERVER_ERROR" => Some(ErrorCode::ServerError),
            "UNKNOWN" => Some(ErrorCode::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified error type for the core's own fallible operations.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum TrellisError {
    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Permission denied by the capability model
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Error message describing the permission issue
        message: String,
    },

    /// Malformed or inconsistent operation envelope
    #[error("Envelope error: {message}")]
    Envelope {
        /// Error message describing the envelope problem
        message: String,
    },

    /// Internal invariant violation
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl TrellisError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create an envelope error
    pub fn envelope(message: impl Into<String>) -> Self {
        Self::Envelope {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Standard Result type for Trellis operations
pub type Result<T> = std::result::Result<T, TrellisError>;
