//! Capability model: pure lookups over static role and plan tables.
//!
//! Both lookups are fail-closed. An action id that appears in neither table
//! denies for every role and every plan, so a typo in a call site can never
//! silently grant access.

use trellis_core::{ActionId, PlanCapabilities, PlanTier, Role};

/// Minimum role required per action. Product data, compiled in.
const MIN_ROLE: &[(&str, Role)] = &[
    ("harvest.estimate_harvest_window", Role::Staff),
    ("harvest.record_yield", Role::Staff),
    ("ec.recommend_correction", Role::Staff),
    ("ec.apply_correction", Role::Manager),
    ("tasks.create", Role::Staff),
    ("tasks.bulk_close", Role::Manager),
    ("verification.approve", Role::Manager),
    ("inventory.adjust", Role::Staff),
    ("grows.archive", Role::Admin),
    ("automation.policy_toggle", Role::Admin),
    ("automation.run_policy", Role::Manager),
    ("team.invite", Role::Admin),
    ("team.remove_member", Role::Admin),
    ("facility.update_settings", Role::Admin),
];

/// Plan gate for an action: minimum tier plus an optional capability flag.
struct PlanRule {
    min_tier: PlanTier,
    required_flag: Option<&'static str>,
}

const fn free() -> PlanRule {
    PlanRule {
        min_tier: PlanTier::Free,
        required_flag: None,
    }
}

const fn commercial() -> PlanRule {
    PlanRule {
        min_tier: PlanTier::Commercial,
        required_flag: Some("commercial"),
    }
}

/// Plan requirements per action. Every entry in `MIN_ROLE` has one here.
const PLAN_RULES: &[(&str, PlanRule)] = &[
    ("harvest.estimate_harvest_window", free()),
    ("harvest.record_yield", free()),
    ("ec.recommend_correction", free()),
    ("ec.apply_correction", free()),
    ("tasks.create", free()),
    ("tasks.bulk_close", free()),
    ("verification.approve", commercial()),
    ("inventory.adjust", free()),
    ("grows.archive", free()),
    ("automation.policy_toggle", commercial()),
    ("automation.run_policy", commercial()),
    ("team.invite", free()),
    ("team.remove_member", free()),
    ("facility.update_settings", free()),
];

/// Does `role` meet the minimum role for `action`?
///
/// Unknown actions deny for every role.
pub fn permits(role: Role, action: &ActionId) -> bool {
    MIN_ROLE
        .iter()
        .find(|(id, _)| *id == action.as_str())
        .map(|(_, minimum)| role.at_least(*minimum))
        .unwrap_or(false)
}

/// Does the session's plan permit `action`?
///
/// Unknown actions deny for every plan; a required flag that is absent from
/// `caps` denies.
pub fn plan_allows(tier: PlanTier, caps: &PlanCapabilities, action: &ActionId) -> bool {
    let Some((_, rule)) = PLAN_RULES.iter().find(|(id, _)| *id == action.as_str()) else {
        return false;
    };
    if !tier.at_least(rule.min_tier) {
        return false;
    }
    match rule.required_flag {
        Some(flag) => caps.has(flag),
        None => true,
    }
}
