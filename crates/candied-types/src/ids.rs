//! Type-safe identifier wrappers around `u64`.
//!
//! Agent identifiers are handed out monotonically by the lifecycle engine's
//! allocator and are never reused within one simulation instance. Run
//! identifiers number the independent simulation instances of a batch.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `u64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Wrap a raw integer value.
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            /// Return the inner integer value.
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a creature or candy within one simulation.
    AgentId
}

define_id! {
    /// Identifier of one (parameter set, iteration) run inside a batch.
    RunId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_by_raw_value() {
        assert!(AgentId::from_raw(3) < AgentId::from_raw(10));
        assert_eq!(AgentId::from(7).into_inner(), 7);
    }

    #[test]
    fn id_serializes_as_plain_integer() {
        let json = serde_json::to_string(&AgentId::from_raw(42)).unwrap();
        assert_eq!(json, "42");
        let restored: AgentId = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, AgentId::from_raw(42));
    }

    #[test]
    fn id_display_matches_raw() {
        assert_eq!(RunId::from_raw(12).to_string(), "12");
    }
}
