//! Full action pipeline: resolve, dispatch, invalidate.
//!
//! Convenience entry point screens drive instead of wiring the three stages
//! themselves. The cache is touched only when the dispatch settles in
//! `Succeeded`; a dispatch paused on confirmation or failed leaves every
//! cached read untouched.

use crate::cache::{CacheConsistencyCoordinator, InvalidationSink};
use crate::dispatcher::{dispatch, DispatchOptions, DispatchOutcome};
use crate::operation::RemoteOperation;
use tracing::{info, instrument};
use trellis_authorization::{resolve, BlockReason, FeatureDescriptor};
use trellis_core::ActionContext;

/// Result of driving one action through the pipeline.
#[derive(Debug)]
pub enum ActionResult<T> {
    /// The resolver blocked the action; nothing was dispatched.
    Blocked {
        /// Why the action cannot run here.
        reason: BlockReason,
    },
    /// The action was dispatched; inspect the outcome for its state.
    Dispatched(DispatchOutcome<T>),
}

impl<T> ActionResult<T> {
    /// Returns `true` if the mutation was applied.
    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Dispatched(outcome) if outcome.is_success())
    }

    /// The dispatch outcome, if the action got past the resolver.
    pub fn dispatched(&self) -> Option<&DispatchOutcome<T>> {
        match self {
            ActionResult::Blocked { .. } => None,
            ActionResult::Dispatched(outcome) => Some(outcome),
        }
    }
}

/// Resolve `feature` in `ctx`, dispatch `operation` if allowed, and invalidate
/// the declared scopes if the mutation succeeded.
#[instrument(skip_all, fields(feature = feature.id, confirm = opts.confirm))]
pub async fn run_action<O, S>(
    feature: &FeatureDescriptor,
    ctx: &ActionContext,
    operation: &O,
    opts: DispatchOptions,
    coordinator: &CacheConsistencyCoordinator<S>,
) -> ActionResult<O::Output>
where
    O: RemoteOperation,
    S: InvalidationSink,
{
    let decision = resolve(feature, ctx);
    if let Some(reason) = decision.block_reason() {
        info!(?reason, "action blocked before dispatch");
        return ActionResult::Blocked { reason };
    }

    let outcome = dispatch(operation, opts).await;
    if outcome.is_success() {
        coordinator.after_success(&feature.action_id(), ctx);
    }
    ActionResult::Dispatched(outcome)
}
