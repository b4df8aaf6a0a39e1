use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only aggregate snapshot of the backend's rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of rules.
    pub total_rules: u64,
    /// Number of enabled rules.
    pub active_rules: u64,
    /// Number of disabled rules.
    pub disabled_rules: u64,
    /// Number of distinct rule sets referenced by rules.
    pub total_rule_sets: u64,
    /// When the backend computed the snapshot.
    pub last_updated: DateTime<Utc>,
}
