//! Action dispatch state machine.
//!
//! One [`dispatch`] call performs exactly one remote call and settles in a
//! terminal state or in [`DispatchState::AwaitingConfirmation`]. Retrying an
//! ordinary failure is a UI decision, not dispatcher behavior, and the
//! confirmation protocol is bounded to a single retry by construction:
//! a dispatch carrying `confirm = true` can never come back as
//! `AwaitingConfirmation`.

use crate::operation::RemoteOperation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use trellis_core::{ErrorCode, OperationError, Outcome};

/// Lifecycle of one in-flight action.
///
/// Created when an action is invoked, discarded with the result; nothing here
/// persists beyond one dispatch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchState {
    /// Not yet invoked.
    Idle,
    /// Remote call in flight.
    Running,
    /// Server demands explicit user confirmation; re-dispatch with
    /// [`DispatchOptions::confirmed`] after prompting.
    AwaitingConfirmation,
    /// Terminal: the mutation was applied.
    Succeeded,
    /// Terminal: the mutation failed.
    Failed,
}

impl DispatchState {
    /// Returns `true` for `Succeeded` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, DispatchState::Succeeded | DispatchState::Failed)
    }
}

/// Options for one dispatch invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Phase-two flag: the user has confirmed and the call should carry
    /// `args.confirm = true`.
    pub confirm: bool,
}

impl DispatchOptions {
    /// First-attempt options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Confirmed-retry options.
    pub fn confirmed() -> Self {
        Self { confirm: true }
    }
}

/// Settled result of one dispatch invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome<T> {
    /// Final state: `Succeeded`, `Failed`, or `AwaitingConfirmation`.
    pub state: DispatchState,
    /// Normalized operation outcome.
    pub outcome: Outcome<T>,
}

impl<T> DispatchOutcome<T> {
    /// Returns `true` if the mutation was applied.
    pub fn is_success(&self) -> bool {
        self.state == DispatchState::Succeeded
    }

    /// Returns `true` if the caller must prompt and re-dispatch confirmed.
    pub fn needs_confirmation(&self) -> bool {
        self.state == DispatchState::AwaitingConfirmation
    }

    /// Classified error code, if the outcome is a failure.
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.outcome.error().map(|e| e.code)
    }
}

/// Execute `operation` once and settle the dispatch state machine.
///
/// - Transport failures (no HTTP status reachable) are classified; they settle
///   as `Failed` with `NETWORK_ERROR` or whatever the classifier decides.
/// - A failure envelope with `USER_CONFIRMATION_REQUIRED` settles as
///   `AwaitingConfirmation` on a first attempt, and as terminal `Failed` when
///   `opts.confirm` was already set: the dispatcher never loops.
/// - Any other failure settles as `Failed` with its code unchanged.
#[instrument(skip(operation), fields(confirm = opts.confirm))]
pub async fn dispatch<O>(operation: &O, opts: DispatchOptions) -> DispatchOutcome<O::Output>
where
    O: RemoteOperation,
{
    debug!("dispatch running");

    let outcome = match operation.call(opts.confirm).await {
        Ok(envelope) => envelope.into_outcome(),
        Err(raw) => {
            let error = OperationError::from_raw(&raw);
            warn!(code = %error.code, "remote call failed before reaching the server");
            Outcome::Failure { error }
        }
    };

    let state = match &outcome {
        Outcome::Success { .. } => {
            info!("dispatch succeeded");
            DispatchState::Succeeded
        }
        Outcome::Failure { error } if error.code == ErrorCode::UserConfirmationRequired => {
            if opts.confirm {
                // Confirmed retry still refused: terminal, never loop.
                warn!("confirmation demanded again after confirmed retry");
                DispatchState::Failed
            } else {
                info!("dispatch awaiting user confirmation");
                DispatchState::AwaitingConfirmation
            }
        }
        Outcome::Failure { error } => {
            warn!(code = %error.code, "dispatch failed");
            DispatchState::Failed
        }
    };

    DispatchOutcome { state, outcome }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use trellis_core::{OperationEnvelope, RawFailure};

    /// Scripted operation: returns the next scripted result per call and
    /// counts invocations.
    struct Scripted {
        results: Mutex<Vec<Result<OperationEnvelope<u32>, RawFailure>>>,
        calls: Mutex<Vec<bool>>,
    }

    impl Scripted {
        fn new(results: Vec<Result<OperationEnvelope<u32>, RawFailure>>) -> Self {
            Self {
                results: Mutex::new(results),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_flags(&self) -> Vec<bool> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl RemoteOperation for Scripted {
        type Output = u32;

        async fn call(&self, confirm: bool) -> Result<OperationEnvelope<u32>, RawFailure> {
            self.calls.lock().push(confirm);
            self.results.lock().remove(0)
        }
    }

    fn confirmation_required() -> OperationEnvelope<u32> {
        OperationEnvelope::failure(OperationError::new(
            ErrorCode::UserConfirmationRequired,
            "re-issue with confirm to apply this correction",
        ))
    }

    #[tokio::test]
    async fn success_settles_succeeded_with_one_call() {
        let op = Scripted::new(vec![Ok(OperationEnvelope::success(7))]);
        let result = dispatch(&op, DispatchOptions::new()).await;
        assert!(result.is_success());
        assert_eq!(result.state, DispatchState::Succeeded);
        assert!(result.state.is_terminal());
        assert_eq!(op.call_flags(), vec![false]);
    }

    #[tokio::test]
    async fn confirmation_demand_pauses_without_retrying() {
        let op = Scripted::new(vec![Ok(confirmation_required())]);
        let result = dispatch(&op, DispatchOptions::new()).await;
        assert!(result.needs_confirmation());
        assert_eq!(result.error_code(), Some(ErrorCode::UserConfirmationRequired));
        // Exactly one underlying call; the retry is the caller's move.
        assert_eq!(op.call_flags(), vec![false]);
    }

    #[tokio::test]
    async fn confirmed_retry_succeeds_terminally() {
        let op = Scripted::new(vec![
            Ok(confirmation_required()),
            Ok(OperationEnvelope::success(1)),
        ]);
        let first = dispatch(&op, DispatchOptions::new()).await;
        assert!(first.needs_confirmation());
        let second = dispatch(&op, DispatchOptions::confirmed()).await;
        assert_eq!(second.state, DispatchState::Succeeded);
        assert_eq!(op.call_flags(), vec![false, true]);
    }

    #[tokio::test]
    async fn repeated_confirmation_demand_is_terminal_failure() {
        let op = Scripted::new(vec![Ok(confirmation_required()), Ok(confirmation_required())]);
        let first = dispatch(&op, DispatchOptions::new()).await;
        assert!(first.needs_confirmation());
        let second = dispatch(&op, DispatchOptions::confirmed()).await;
        // Never re-enters AwaitingConfirmation under confirm=true.
        assert_eq!(second.state, DispatchState::Failed);
        assert_eq!(second.error_code(), Some(ErrorCode::UserConfirmationRequired));
        assert_eq!(op.call_flags(), vec![false, true]);
    }

    #[tokio::test]
    async fn transport_failure_classifies_as_network_error() {
        let op = Scripted::new(vec![Err(RawFailure::transport("connection timed out"))]);
        let result = dispatch(&op, DispatchOptions::new()).await;
        assert_eq!(result.state, DispatchState::Failed);
        assert_eq!(result.error_code(), Some(ErrorCode::NetworkError));
    }

    #[tokio::test]
    async fn server_failure_code_surfaces_unchanged() {
        let op = Scripted::new(vec![Ok(OperationEnvelope::failure(OperationError::new(
            ErrorCode::ValidationError,
            "ppm out of range",
        )))]);
        let result = dispatch(&op, DispatchOptions::new()).await;
        assert_eq!(result.state, DispatchState::Failed);
        assert_eq!(result.error_code(), Some(ErrorCode::ValidationError));
    }

    #[tokio::test]
    async fn inconsistent_envelope_fails_as_unknown() {
        let op = Scripted::new(vec![Ok(OperationEnvelope {
            success: false,
            data: None,
            error: None,
        })]);
        let result = dispatch(&op, DispatchOptions::new()).await;
        assert_eq!(result.state, DispatchState::Failed);
        assert_eq!(result.error_code(), Some(ErrorCode::Unknown));
    }
}
