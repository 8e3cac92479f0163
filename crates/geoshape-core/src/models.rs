//! Shared value types used across geoshape crates.

use serde::{Deserialize, Serialize};

/// What to do when assigning a CRS to a geometry that already has a different one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OverridePolicy {
    /// Refuse with a CRS conflict error
    #[default]
    Reject,
    /// Replace the CRS without touching coordinates
    Allow,
}

impl OverridePolicy {
    pub fn allows_override(&self) -> bool {
        matches!(self, OverridePolicy::Allow)
    }
}

impl From<bool> for OverridePolicy {
    fn from(allow: bool) -> Self {
        if allow {
            OverridePolicy::Allow
        } else {
            OverridePolicy::Reject
        }
    }
}
