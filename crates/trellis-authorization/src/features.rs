//! Static feature-descriptor table.
//!
//! Single source of truth for which actions exist, which screen owns them,
//! whether they are enabled in this build, and what context they need. Never
//! mutated at runtime; `enabled` reflects build/rollout state, not per-user
//! permission.

use serde::Serialize;
use trellis_core::{ActionId, Result, TrellisError};

/// Context a feature needs before it can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContextRequirements {
    /// A facility must be selected.
    pub facility_id: bool,
    /// A grow must be selected.
    pub grow_id: bool,
}

impl ContextRequirements {
    /// Needs neither facility nor grow.
    pub const NONE: Self = Self {
        facility_id: false,
        grow_id: false,
    };
    /// Needs a selected facility.
    pub const FACILITY: Self = Self {
        facility_id: true,
        grow_id: false,
    };
    /// Needs a selected facility and grow.
    pub const FACILITY_AND_GROW: Self = Self {
        facility_id: true,
        grow_id: true,
    };
}

/// Static declaration of an invocable action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureDescriptor {
    /// Action id, the key into the capability tables.
    pub id: &'static str,
    /// Human-readable label shown in the UI.
    pub label: &'static str,
    /// Build/rollout enablement. Disabled features resolve to `Disabled`
    /// before any context or permission check runs.
    pub enabled: bool,
    /// Screen that owns this action.
    pub screen: &'static str,
    /// Context the action needs.
    pub requires: ContextRequirements,
}

impl FeatureDescriptor {
    /// The action id as a typed key.
    pub fn action_id(&self) -> ActionId {
        ActionId::from(self.id)
    }
}

/// The compiled feature table.
pub const FEATURES: &[FeatureDescriptor] = &[
    FeatureDescriptor {
        id: "harvest.estimate_harvest_window",
        label: "Estimate harvest window",
        enabled: true,
        screen: "harvest",
        requires: ContextRequirements::FACILITY_AND_GROW,
    },
    FeatureDescriptor {
        id: "harvest.record_yield",
        label: "Record yield",
        enabled: true,
        screen: "harvest",
        requires: ContextRequirements::FACILITY_AND_GROW,
    },
    FeatureDescriptor {
        id: "ec.recommend_correction",
        label: "Recommend EC correction",
        enabled: true,
        screen: "nutrients",
        requires: ContextRequirements::FACILITY,
    },
    FeatureDescriptor {
        id: "ec.apply_correction",
        label: "Apply EC correction",
        enabled: true,
        screen: "nutrients",
        requires: ContextRequirements::FACILITY_AND_GROW,
    },
    FeatureDescriptor {
        id: "tasks.create",
        label: "Create task",
        enabled: true,
        screen: "tasks",
        requires: ContextRequirements::FACILITY,
    },
    FeatureDescriptor {
        id: "tasks.bulk_close",
        label: "Close completed tasks",
        enabled: true,
        screen: "tasks",
        requires: ContextRequirements::FACILITY,
    },
    FeatureDescriptor {
        id: "verification.approve",
        label: "Approve verification record",
        enabled: true,
        screen: "verification",
        requires: ContextRequirements::FACILITY,
    },
    FeatureDescriptor {
        id: "inventory.adjust",
        label: "Adjust inventory",
        enabled: true,
        screen: "inventory",
        requires: ContextRequirements::FACILITY,
    },
    FeatureDescriptor {
        id: "grows.archive",
        label: "Archive grow",
        enabled: true,
        screen: "grows",
        requires: ContextRequirements::FACILITY_AND_GROW,
    },
    FeatureDescriptor {
        id: "automation.policy_toggle",
        label: "Toggle automation policy",
        enabled: true,
        screen: "automation",
        requires: ContextRequirements::FACILITY,
    },
    FeatureDescriptor {
        id: "automation.run_policy",
        label: "Run automation policy now",
        enabled: false, // rollout pending
        screen: "automation",
        requires: ContextRequirements::FACILITY,
    },
    FeatureDescriptor {
        id: "team.invite",
        label: "Invite team member",
        enabled: true,
        screen: "team",
        requires: ContextRequirements::FACILITY,
    },
    FeatureDescriptor {
        id: "team.remove_member",
        label: "Remove team member",
        enabled: true,
        screen: "team",
        requires: ContextRequirements::FACILITY,
    },
    FeatureDescriptor {
        id: "facility.update_settings",
        label: "Update facility settings",
        enabled: true,
        screen: "settings",
        requires: ContextRequirements::FACILITY,
    },
];

/// Look up a feature descriptor by action id.
pub fn feature(id: &ActionId) -> Option<&'static FeatureDescriptor> {
    FEATURES.iter().find(|f| f.id == id.as_str())
}

/// Look up a feature descriptor, erroring on ids the table does not declare.
///
/// For call sites wired from route or config data rather than compiled
/// constants, where a miss is a bug worth surfacing.
pub fn require_feature(id: &ActionId) -> Result<&'static FeatureDescriptor> {
    feature(id).ok_or_else(|| TrellisError::invalid(format!("unknown feature id: {id}")))
}
