//! # Trellis Dispatch - mutation execution and cache consistency
//!
//! Runs remote mutations through a bounded two-phase confirmation protocol and
//! keeps cached reads consistent after a mutation succeeds.
//!
//! The pipeline a screen drives:
//!
//! 1. Resolve the feature against the explicit context (trellis-authorization).
//! 2. [`dispatch`] the operation: exactly one remote call per invocation, with
//!    failures classified into the closed taxonomy.
//! 3. On `USER_CONFIRMATION_REQUIRED`, surface [`DispatchState::AwaitingConfirmation`]
//!    to the caller; the caller prompts the user and re-dispatches with
//!    `confirm = true`. A second confirmation demand is terminal.
//! 4. On success, the [`CacheConsistencyCoordinator`] invalidates the read
//!    scopes the mutation declares, so the next read is fresh.
//!
//! [`run_action`] composes all four steps.

#![forbid(unsafe_code)]

pub mod cache;
pub mod dispatcher;
pub mod operation;
pub mod pipeline;

pub use cache::{
    scopes_for, CacheConsistencyCoordinator, InMemoryScopeRegistry, InvalidationSink,
    ResourceKind, ScopeKey,
};
pub use dispatcher::{dispatch, DispatchOptions, DispatchOutcome, DispatchState};
pub use operation::RemoteOperation;
pub use pipeline::{run_action, ActionResult};
