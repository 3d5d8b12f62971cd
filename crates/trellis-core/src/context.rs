//! Roles, plan capabilities, and the explicit action context.
//!
//! [`ActionContext`] replaces ambient session/facility globals with explicit
//! parameter passing: every resolver and dispatch call receives a read-only
//! snapshot assembled by the caller at invocation time. Nothing in the core
//! mutates it or reaches around it.

use crate::identifiers::{FacilityId, GrowId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Facility membership role. Closed set, assigned externally, read-only here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full owner of the facility.
    Owner,
    /// Administrative access, short of ownership transfer.
    Admin,
    /// Day-to-day operational management.
    Manager,
    /// Operational staff.
    Staff,
    /// Read-only access.
    Viewer,
}

impl Role {
    /// Rank for minimum-role comparisons; higher rank means more authority.
    pub fn rank(self) -> u8 {
        match self {
            Role::Viewer => 0,
            Role::Staff => 1,
            Role::Manager => 2,
            Role::Admin => 3,
            Role::Owner => 4,
        }
    }

    /// Returns `true` if this role meets or exceeds `minimum`.
    pub fn at_least(self, minimum: Role) -> bool {
        self.rank() >= minimum.rank()
    }
}

/// Subscription tier. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    /// Free tier.
    Free,
    /// Pro tier.
    Pro,
    /// Commercial tier.
    Commercial,
    /// Multi-site facility tier.
    Facility,
}

impl PlanTier {
    /// Rank for minimum-tier comparisons; higher rank means a bigger plan.
    pub fn rank(self) -> u8 {
        match self {
            PlanTier::Free => 0,
            PlanTier::Pro => 1,
            PlanTier::Commercial => 2,
            PlanTier::Facility => 3,
        }
    }

    /// Returns `true` if this tier meets or exceeds `minimum`.
    pub fn at_least(self, minimum: PlanTier) -> bool {
        self.rank() >= minimum.rank()
    }
}

/// Plan tier plus named boolean capability flags.
///
/// Loaded once per session and snapshotted into each [`ActionContext`].
/// Lookups are fail-closed: a flag that is absent reads as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCapabilities {
    /// Subscription tier.
    pub tier: PlanTier,
    /// Named capability flags, e.g. `commercial`, `admin`.
    pub flags: BTreeMap<String, bool>,
}

impl PlanCapabilities {
    /// Capabilities for a tier with no extra flags.
    pub fn for_tier(tier: PlanTier) -> Self {
        Self {
            tier,
            flags: BTreeMap::new(),
        }
    }

    /// Set a capability flag.
    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }

    /// Fail-closed flag lookup: absent flags read as `false`.
    pub fn has(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }
}

/// Read-only snapshot of everything a permission or dispatch decision needs.
///
/// Assembled per invocation from session/facility/selection state by the
/// caller. The core only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionContext {
    /// Caller's role at the facility in context.
    pub role: Role,
    /// Session plan capabilities.
    pub capabilities: PlanCapabilities,
    /// Selected facility, if any.
    pub facility_id: Option<FacilityId>,
    /// Selected grow, if any.
    pub grow_id: Option<GrowId>,
}

impl ActionContext {
    /// Context with no facility or grow selected.
    pub fn new(role: Role, capabilities: PlanCapabilities) -> Self {
        Self {
            role,
            capabilities,
            facility_id: None,
            grow_id: None,
        }
    }

    /// Context scoped to a facility.
    pub fn for_facility(
        role: Role,
        capabilities: PlanCapabilities,
        facility_id: FacilityId,
    ) -> Self {
        Self {
            role,
            capabilities,
            facility_id: Some(facility_id),
            grow_id: None,
        }
    }

    /// Add a selected grow.
    pub fn with_grow(mut self, grow_id: GrowId) -> Self {
        self.grow_id = Some(grow_id);
        self
    }
}
