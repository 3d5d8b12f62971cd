//! Pipeline-level scenarios: confirmation protocol and cache consistency.

use assert_matches::assert_matches;
use async_trait::async_trait;
use parking_lot::Mutex;
use trellis_authorization::{feature, BlockReason};
use trellis_core::{
    ActionContext, ActionId, ErrorCode, FacilityId, GrowId, OperationEnvelope, OperationError,
    PlanCapabilities, PlanTier, RawFailure, Role,
};
use trellis_dispatch::{
    dispatch, run_action, ActionResult, CacheConsistencyCoordinator, DispatchOptions,
    DispatchState, InMemoryScopeRegistry, RemoteOperation, ResourceKind, ScopeKey,
};

/// Scripted remote operation that records every call's confirm flag.
struct Scripted {
    results: Mutex<Vec<Result<OperationEnvelope<serde_json::Value>, RawFailure>>>,
    calls: Mutex<Vec<bool>>,
}

impl Scripted {
    fn new(results: Vec<Result<OperationEnvelope<serde_json::Value>, RawFailure>>) -> Self {
        Self {
            results: Mutex::new(results),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl RemoteOperation for Scripted {
    type Output = serde_json::Value;

    async fn call(
        &self,
        confirm: bool,
    ) -> Result<OperationEnvelope<serde_json::Value>, RawFailure> {
        self.calls.lock().push(confirm);
        self.results.lock().remove(0)
    }
}

fn manager_ctx() -> ActionContext {
    ActionContext::for_facility(
        Role::Manager,
        PlanCapabilities::for_tier(PlanTier::Commercial).with_flag("commercial", true),
        FacilityId::from("fac_1"),
    )
    .with_grow(GrowId::from("grow_4"))
}

fn confirmation_required() -> OperationEnvelope<serde_json::Value> {
    OperationEnvelope::failure(OperationError::new(
        ErrorCode::UserConfirmationRequired,
        "applying this correction is irreversible",
    ))
}

fn nutrients_scope() -> ScopeKey {
    ScopeKey::new(ResourceKind::Nutrients, FacilityId::from("fac_1")).with_param("grow_4")
}

fn grows_scope() -> ScopeKey {
    ScopeKey::new(ResourceKind::Grows, FacilityId::from("fac_1"))
}

#[tokio::test]
async fn confirmation_cycle_invalidates_exactly_once() {
    let ctx = manager_ctx();
    let apply = feature(&ActionId::from("ec.apply_correction")).unwrap();

    let registry = InMemoryScopeRegistry::new();
    registry.note_read(nutrients_scope());
    registry.note_read(grows_scope());
    let coordinator = CacheConsistencyCoordinator::new(registry);

    let op = Scripted::new(vec![
        Ok(confirmation_required()),
        Ok(OperationEnvelope::success(serde_json::json!({"applied": true}))),
    ]);

    // Phase one: server demands confirmation; nothing is invalidated.
    let first = run_action(apply, &ctx, &op, DispatchOptions::new(), &coordinator).await;
    let outcome = first.dispatched().unwrap();
    assert_eq!(outcome.state, DispatchState::AwaitingConfirmation);
    assert!(coordinator.sink().is_fresh(&nutrients_scope()));
    assert!(coordinator.sink().is_fresh(&grows_scope()));

    // Phase two: confirmed retry succeeds; declared scopes drop exactly once.
    let second = run_action(apply, &ctx, &op, DispatchOptions::confirmed(), &coordinator).await;
    assert!(second.is_success());
    assert!(!coordinator.sink().is_fresh(&nutrients_scope()));
    assert!(!coordinator.sink().is_fresh(&grows_scope()));
    assert_eq!(coordinator.sink().fresh_count(), 0);
    assert_eq!(op.call_count(), 2);
}

#[tokio::test]
async fn timeout_fails_without_touching_the_cache() {
    let ctx = manager_ctx();
    let create = feature(&ActionId::from("tasks.create")).unwrap();

    let registry = InMemoryScopeRegistry::new();
    let tasks_scope = ScopeKey::new(ResourceKind::Tasks, FacilityId::from("fac_1"));
    registry.note_read(tasks_scope.clone());
    let coordinator = CacheConsistencyCoordinator::new(registry);

    let op = Scripted::new(vec![Err(RawFailure::transport("request timed out"))]);
    let result = run_action(create, &ctx, &op, DispatchOptions::new(), &coordinator).await;

    let outcome = result.dispatched().unwrap();
    assert_eq!(outcome.state, DispatchState::Failed);
    assert_eq!(outcome.error_code(), Some(ErrorCode::NetworkError));
    assert!(coordinator.sink().is_fresh(&tasks_scope));
}

#[tokio::test]
async fn blocked_actions_never_reach_the_wire() {
    let viewer = ActionContext::for_facility(
        Role::Viewer,
        PlanCapabilities::for_tier(PlanTier::Commercial).with_flag("commercial", true),
        FacilityId::from("fac_1"),
    );
    let invite = feature(&ActionId::from("team.invite")).unwrap();

    let coordinator = CacheConsistencyCoordinator::new(InMemoryScopeRegistry::new());
    let op = Scripted::new(vec![]);

    let result = run_action(invite, &viewer, &op, DispatchOptions::new(), &coordinator).await;
    assert_matches!(
        result,
        ActionResult::Blocked {
            reason: BlockReason::NotPermitted
        }
    );
    assert_eq!(op.call_count(), 0);
}

#[tokio::test]
async fn double_invalidation_after_success_is_harmless() {
    // Archiving a grow is an admin action.
    let ctx = ActionContext::for_facility(
        Role::Admin,
        PlanCapabilities::for_tier(PlanTier::Commercial).with_flag("commercial", true),
        FacilityId::from("fac_1"),
    )
    .with_grow(GrowId::from("grow_4"));
    let coordinator = CacheConsistencyCoordinator::new(InMemoryScopeRegistry::new());
    coordinator.sink().note_read(grows_scope());

    let archive = feature(&ActionId::from("grows.archive")).unwrap();
    let op = Scripted::new(vec![Ok(OperationEnvelope::success(serde_json::json!(null)))]);
    let result = run_action(archive, &ctx, &op, DispatchOptions::new(), &coordinator).await;
    assert!(result.is_success());
    assert!(!coordinator.sink().is_fresh(&grows_scope()));

    // A second manual invalidation of the same scopes changes nothing.
    coordinator.after_success(&ActionId::from("grows.archive"), &ctx);
    assert_eq!(coordinator.sink().fresh_count(), 0);
}

#[tokio::test]
async fn concurrent_dispatches_settle_independently() {
    let ok = Scripted::new(vec![Ok(OperationEnvelope::success(serde_json::json!(1)))]);
    let failing = Scripted::new(vec![Err(RawFailure::transport("dns failure"))]);

    let (a, b) = tokio::join!(
        dispatch(&ok, DispatchOptions::new()),
        dispatch(&failing, DispatchOptions::new()),
    );
    assert_eq!(a.state, DispatchState::Succeeded);
    assert_eq!(b.state, DispatchState::Failed);
    assert_eq!(b.error_code(), Some(ErrorCode::NetworkError));
}
