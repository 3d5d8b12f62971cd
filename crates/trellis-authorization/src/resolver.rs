//! Feature requirement resolution.
//!
//! Decides whether a feature can run in the caller's context and, when it
//! cannot, which prompt the UI should show. The check order is fixed:
//! enablement before context, context before permission. "Not built yet",
//! "pick a grow first", and "you don't have access" are different prompts, so
//! the first failing check wins and later ones are not consulted.

use crate::capability::{permits, plan_allows};
use crate::features::FeatureDescriptor;
use serde::{Deserialize, Serialize};
use tracing::debug;
use trellis_core::ActionContext;

/// Why a feature cannot run. Ordered by check priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockReason {
    /// Feature is disabled in this build/rollout.
    Disabled,
    /// Feature needs a selected facility and none is selected.
    MissingFacility,
    /// Feature needs a selected grow and none is selected.
    MissingGrow,
    /// Role or plan does not permit the action.
    NotPermitted,
}

/// Decision from requirement resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureDecision {
    /// The feature can run in this context.
    Allowed,
    /// The feature cannot run.
    Blocked {
        /// First failing check.
        reason: BlockReason,
    },
}

impl FeatureDecision {
    /// Returns `true` if the feature can run.
    pub fn can_run(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// The blocking reason, if blocked.
    pub fn block_reason(&self) -> Option<BlockReason> {
        match self {
            Self::Allowed => None,
            Self::Blocked { reason } => Some(*reason),
        }
    }
}

/// Resolve whether `feature` can run in `ctx`.
///
/// Pure function of its arguments: no clock, no globals, no I/O. Identical
/// inputs always yield identical decisions.
pub fn resolve(feature: &FeatureDescriptor, ctx: &ActionContext) -> FeatureDecision {
    let decision = resolve_inner(feature, ctx);
    if let FeatureDecision::Blocked { reason } = decision {
        debug!(feature = feature.id, ?reason, "feature blocked");
    }
    decision
}

fn resolve_inner(feature: &FeatureDescriptor, ctx: &ActionContext) -> FeatureDecision {
    if !feature.enabled {
        return FeatureDecision::Blocked {
            reason: BlockReason::Disabled,
        };
    }
    if feature.requires.facility_id && ctx.facility_id.is_none() {
        return FeatureDecision::Blocked {
            reason: BlockReason::MissingFacility,
        };
    }
    if feature.requires.grow_id && ctx.grow_id.is_none() {
        return FeatureDecision::Blocked {
            reason: BlockReason::MissingGrow,
        };
    }
    let action = feature.action_id();
    if !permits(ctx.role, &action)
        || !plan_allows(ctx.capabilities.tier, &ctx.capabilities, &action)
    {
        return FeatureDecision::Blocked {
            reason: BlockReason::NotPermitted,
        };
    }
    FeatureDecision::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{feature, ContextRequirements};
    use assert_matches::assert_matches;
    use trellis_core::{ActionContext, ActionId, FacilityId, GrowId, PlanCapabilities, PlanTier, Role};

    fn ctx(role: Role) -> ActionContext {
        ActionContext::for_facility(
            role,
            PlanCapabilities::for_tier(PlanTier::Commercial).with_flag("commercial", true),
            FacilityId::from("fac_1"),
        )
    }

    #[test]
    fn viewer_blocked_from_admin_feature() {
        let invite = feature(&ActionId::from("team.invite")).unwrap();
        let decision = resolve(invite, &ctx(Role::Viewer));
        assert_matches!(
            decision,
            FeatureDecision::Blocked {
                reason: BlockReason::NotPermitted
            }
        );
    }

    #[test]
    fn missing_grow_reported_before_permission() {
        // Viewer lacks permission too, but context is checked first.
        let estimate = feature(&ActionId::from("harvest.estimate_harvest_window")).unwrap();
        let decision = resolve(estimate, &ctx(Role::Viewer));
        assert_matches!(
            decision,
            FeatureDecision::Blocked {
                reason: BlockReason::MissingGrow
            }
        );
    }

    #[test]
    fn disabled_reported_before_everything() {
        let run_policy = feature(&ActionId::from("automation.run_policy")).unwrap();
        let bare = ActionContext::new(Role::Viewer, PlanCapabilities::for_tier(PlanTier::Free));
        assert_matches!(
            resolve(run_policy, &bare),
            FeatureDecision::Blocked {
                reason: BlockReason::Disabled
            }
        );
    }

    #[test]
    fn missing_facility_reported_before_missing_grow() {
        let descriptor = FeatureDescriptor {
            id: "harvest.estimate_harvest_window",
            label: "Estimate harvest window",
            enabled: true,
            screen: "harvest",
            requires: ContextRequirements::FACILITY_AND_GROW,
        };
        let bare = ActionContext::new(
            Role::Staff,
            PlanCapabilities::for_tier(PlanTier::Commercial),
        );
        assert_matches!(
            resolve(&descriptor, &bare),
            FeatureDecision::Blocked {
                reason: BlockReason::MissingFacility
            }
        );
    }

    #[test]
    fn staff_with_grow_may_estimate_harvest() {
        let estimate = feature(&ActionId::from("harvest.estimate_harvest_window")).unwrap();
        let decision = resolve(estimate, &ctx(Role::Staff).with_grow(GrowId::from("grow_1")));
        assert!(decision.can_run());
        assert_eq!(decision.block_reason(), None);
    }

    #[test]
    fn plan_gate_blocks_as_not_permitted() {
        let toggle = feature(&ActionId::from("automation.policy_toggle")).unwrap();
        let free_admin = ActionContext::for_facility(
            Role::Admin,
            PlanCapabilities::for_tier(PlanTier::Free),
            FacilityId::from("fac_1"),
        );
        assert_matches!(
            resolve(toggle, &free_admin),
            FeatureDecision::Blocked {
                reason: BlockReason::NotPermitted
            }
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let approve = feature(&ActionId::from("verification.approve")).unwrap();
        let context = ctx(Role::Manager);
        let first = resolve(approve, &context);
        for _ in 0..10 {
            assert_eq!(resolve(approve, &context), first);
        }
    }
}
