//! Resource limits applied while validating and hashing typed messages.
//!
//! Messages arrive from untrusted callers, so declarations and payloads are
//! bounded before any hashing work is done.

use serde::{Deserialize, Serialize};

/// Bounds on typed-message size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum struct/array nesting depth while encoding (E302)
    pub max_nesting_depth: u64,
    /// Maximum number of elements in one array value (E303)
    pub max_array_length: u64,
    /// Maximum number of declared types (E304)
    pub max_types: u64,
    /// Maximum number of fields in one declaration (E305)
    pub max_fields_per_type: u64,
}

impl Limits {
    /// Default limits for signing requests.
    pub const fn consensus() -> Self {
        Self {
            max_nesting_depth: 32,
            max_array_length: 10_000,
            max_types: 256,
            max_fields_per_type: 256,
        }
    }

    /// Lenient limits for offline tooling.
    pub const fn lenient() -> Self {
        Self {
            max_nesting_depth: 128,
            max_array_length: 100_000,
            max_types: 4096,
            max_fields_per_type: 4096,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::consensus()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consensus_limits() {
        let limits = Limits::consensus();
        assert_eq!(limits.max_nesting_depth, 32);
        assert_eq!(limits.max_array_length, 10_000);
        assert_eq!(Limits::default(), limits);
    }

    #[test]
    fn test_lenient_limits() {
        let limits = Limits::lenient();
        assert!(limits.max_nesting_depth > Limits::consensus().max_nesting_depth);
        assert!(limits.max_types > Limits::consensus().max_types);
    }

    #[test]
    fn test_partial_deserialize() {
        let limits: Limits = serde_json::from_str(r#"{"max_array_length": 5}"#).unwrap();
        assert_eq!(limits.max_array_length, 5);
        assert_eq!(limits.max_nesting_depth, 32);
    }
}
