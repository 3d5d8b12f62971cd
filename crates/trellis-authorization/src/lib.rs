//! # Trellis Authorization - who may invoke what
//!
//! Advisory permission layer the UI consults before showing or enabling an
//! action. The server remains the authority; this layer exists so screens can
//! distinguish "not built yet" from "pick a grow first" from "you don't have
//! access" without a round trip.
//!
//! Everything here is pure lookup over static tables plus an explicit
//! [`trellis_core::ActionContext`]: no I/O, no ambient state, and every
//! unknown action id denies (fail-closed).

#![forbid(unsafe_code)]

pub mod capability;
pub mod features;
pub mod resolver;
pub mod session;

pub use capability::{permits, plan_allows};
pub use features::{feature, require_feature, ContextRequirements, FeatureDescriptor, FEATURES};
pub use resolver::{resolve, BlockReason, FeatureDecision};
pub use session::SessionCapabilityStore;
