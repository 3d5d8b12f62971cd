//! Typed identifiers used throughout the core.
//!
//! Newtypes over strings so call sites cannot confuse a facility id with a
//! grow id, and so permission lookups are keyed by [`ActionId`] rather than
//! bare strings.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the underlying string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Identifier of a facility the session is operating on.
    FacilityId
}

string_id! {
    /// Identifier of a grow (cultivation run) within a facility.
    GrowId
}

string_id! {
    /// Server-assigned request identifier carried on error payloads.
    RequestId
}

string_id! {
    /// Identifier of an invocable action, e.g. `harvest.estimate_harvest_window`.
    ///
    /// Permission tables and the feature-descriptor table are keyed by this.
    ActionId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_as_transparent_strings() {
        let id = FacilityId::from("fac_123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"fac_123\"");
        let back: FacilityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn action_ids_are_distinct_from_display() {
        let id = ActionId::new("ec.recommend_correction");
        assert_eq!(id.as_str(), "ec.recommend_correction");
        assert_eq!(id.to_string(), "ec.recommend_correction");
    }
}
