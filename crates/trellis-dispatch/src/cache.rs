//! Cache consistency coordination.
//!
//! After a mutation settles successfully, the read scopes it affects must be
//! invalidated so the next read is fresh. Each mutation declares its scopes
//! statically in [`scopes_for`]; the coordinator only ever invalidates, it
//! never writes response data into a cache (write-through is the read path's
//! concern).
//!
//! Invalidation is idempotent and order-independent, and invalidating a scope
//! with no active cached read is a no-op, never an error.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;
use trellis_core::{ActionContext, ActionId, FacilityId};

/// Resource families a read scope can cover. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Task lists and boards.
    Tasks,
    /// Verification records.
    Verification,
    /// Grow summaries and detail reads.
    Grows,
    /// Harvest estimates and yield history.
    Harvest,
    /// Nutrient/EC readings and recommendations.
    Nutrients,
    /// Inventory levels.
    Inventory,
    /// Team membership.
    Team,
    /// Automation policies.
    Automation,
    /// Facility settings.
    FacilitySettings,
}

/// Identifier of a cached read set.
///
/// Structured, ordered, and hashable so scope sets are cheap to diff and
/// deterministic to log.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScopeKey {
    /// Resource family.
    pub resource: ResourceKind,
    /// Facility the reads belong to.
    pub facility_id: FacilityId,
    /// Extra discriminators, e.g. a grow id.
    pub params: Vec<String>,
}

impl ScopeKey {
    /// Scope covering a whole resource family within a facility.
    pub fn new(resource: ResourceKind, facility_id: FacilityId) -> Self {
        Self {
            resource,
            facility_id,
            params: Vec::new(),
        }
    }

    /// Narrow the scope with an extra discriminator.
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }
}

impl std::fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}:{}", self.resource, self.facility_id)?;
        for param in &self.params {
            write!(f, ":{param}")?;
        }
        Ok(())
    }
}

/// Read scopes a mutation invalidates, declared statically per action.
///
/// Mutations act within a facility; without one in context there are no
/// facility-scoped reads to invalidate and the result is empty.
pub fn scopes_for(action: &ActionId, ctx: &ActionContext) -> Vec<ScopeKey> {
    let Some(facility_id) = ctx.facility_id.clone() else {
        return Vec::new();
    };
    let scope = |resource| ScopeKey::new(resource, facility_id.clone());
    let grow_scope = |resource| {
        let key = scope(resource);
        match &ctx.grow_id {
            Some(grow_id) => key.with_param(grow_id.as_str()),
            None => key,
        }
    };

    match action.as_str() {
        "tasks.create" | "tasks.bulk_close" => vec![scope(ResourceKind::Tasks)],
        "verification.approve" => vec![scope(ResourceKind::Verification)],
        "harvest.estimate_harvest_window" => vec![grow_scope(ResourceKind::Harvest)],
        "harvest.record_yield" => {
            vec![grow_scope(ResourceKind::Harvest), scope(ResourceKind::Grows)]
        }
        "ec.recommend_correction" => vec![scope(ResourceKind::Nutrients)],
        "ec.apply_correction" => {
            vec![grow_scope(ResourceKind::Nutrients), scope(ResourceKind::Grows)]
        }
        "inventory.adjust" => vec![scope(ResourceKind::Inventory)],
        "grows.archive" => vec![scope(ResourceKind::Grows), scope(ResourceKind::Tasks)],
        "automation.policy_toggle" | "automation.run_policy" => {
            vec![scope(ResourceKind::Automation)]
        }
        "team.invite" | "team.remove_member" => vec![scope(ResourceKind::Team)],
        "facility.update_settings" => vec![scope(ResourceKind::FacilitySettings)],
        // Unknown mutations affect nothing we know about.
        _ => Vec::new(),
    }
}

/// Sink the coordinator pushes invalidations into.
///
/// The app's query cache implements this; tests use [`InMemoryScopeRegistry`].
pub trait InvalidationSink: Send + Sync {
    /// Drop the cached reads under each scope. Must be idempotent and must
    /// treat unknown scopes as no-ops.
    fn invalidate(&self, scopes: &[ScopeKey]);
}

/// In-memory scope registry tracking which scopes hold fresh cached reads.
///
/// The read path calls [`note_read`] when it caches a scope and [`is_fresh`]
/// before serving from cache; invalidation removes scopes from the fresh set.
///
/// [`note_read`]: InMemoryScopeRegistry::note_read
/// [`is_fresh`]: InMemoryScopeRegistry::is_fresh
#[derive(Debug, Default)]
pub struct InMemoryScopeRegistry {
    fresh: RwLock<BTreeSet<ScopeKey>>,
}

impl InMemoryScopeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a read under `scope` is now cached.
    pub fn note_read(&self, scope: ScopeKey) {
        self.fresh.write().insert(scope);
    }

    /// Returns `true` if cached reads under `scope` are still fresh.
    pub fn is_fresh(&self, scope: &ScopeKey) -> bool {
        self.fresh.read().contains(scope)
    }

    /// Number of fresh scopes (test observability).
    pub fn fresh_count(&self) -> usize {
        self.fresh.read().len()
    }
}

impl InvalidationSink for InMemoryScopeRegistry {
    fn invalidate(&self, scopes: &[ScopeKey]) {
        let mut fresh = self.fresh.write();
        for scope in scopes {
            // Absent scopes are a no-op; removal is naturally idempotent.
            if fresh.remove(scope) {
                debug!(%scope, "scope invalidated");
            }
        }
    }
}

/// Invalidates affected read scopes after a mutation succeeds.
#[derive(Debug)]
pub struct CacheConsistencyCoordinator<S: InvalidationSink> {
    sink: S,
}

impl<S: InvalidationSink> CacheConsistencyCoordinator<S> {
    /// Coordinator over `sink`.
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Invalidate explicit scopes. Idempotent and order-independent.
    pub fn invalidate(&self, scopes: &[ScopeKey]) {
        if scopes.is_empty() {
            return;
        }
        self.sink.invalidate(scopes);
    }

    /// Invalidate the scopes `action` declares for `ctx`. Called only after a
    /// dispatch settles in `Succeeded`.
    pub fn after_success(&self, action: &ActionId, ctx: &ActionContext) {
        let scopes = scopes_for(action, ctx);
        debug!(action = %action, count = scopes.len(), "invalidating declared scopes");
        self.invalidate(&scopes);
    }

    /// Access the underlying sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }
}
