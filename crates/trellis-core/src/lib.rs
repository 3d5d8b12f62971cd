//! Trellis Core - shared vocabulary for the client authorization/dispatch core
//!
//! This crate provides the foundational types every other Trellis crate speaks:
//! typed identifiers, the normalized operation envelope, the closed error
//! taxonomy with its classifier, and the explicit action context.
//!
//! Two boundary rules hold everywhere:
//!
//! - Every remote outcome is normalized into [`OperationEnvelope`] before it
//!   enters the core; no component branches on ad hoc response shapes.
//! - Context is passed explicitly as [`ActionContext`] snapshots; nothing in
//!   the core reads session or facility state from ambient globals.

#![forbid(unsafe_code)]

/// Facility, grow, request, and action identifiers
pub mod identifiers;

/// Unified error handling and the closed error-code taxonomy
pub mod errors;

/// Failure classification into the closed taxonomy
pub mod classify;

/// Normalized remote-operation envelope and request wire shapes
pub mod envelope;

/// Roles, plan capabilities, and the explicit per-invocation context
pub mod context;

pub use classify::{classify, RawFailure};
pub use context::{ActionContext, PlanCapabilities, PlanTier, Role};
pub use envelope::{OperationEnvelope, OperationError, OperationRequest, Outcome};
pub use errors::{ErrorCode, ErrorRoute, Result, TrellisError};
pub use identifiers::{ActionId, FacilityId, GrowId, RequestId};
