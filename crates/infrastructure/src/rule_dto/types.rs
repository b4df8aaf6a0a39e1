use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One band as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRateBand {
    /// Window length in seconds.
    pub window_seconds: u64,
    /// Requests allowed per window.
    pub capacity: u64,
    /// Display label, absent on older payloads.
    pub label: Option<String>,
}

/// One rule as returned by the backend.
///
/// Enumerations stay strings on the wire; mapping decides how to type them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRule {
    /// Stable rule id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the backend enforces the rule.
    pub enabled: bool,
    /// Scope name, e.g. `PER_IP`.
    pub scope: String,
    /// Key strategy used to bucket requests.
    pub key_strategy_id: String,
    /// Policy name, e.g. `REJECT_REQUEST`.
    pub on_limit_exceed_policy: String,
    /// Limit bands, checked in order.
    pub bands: Vec<ApiRateBand>,
    /// Owning rule set, if any.
    pub rule_set_id: Option<String>,
    /// Free-form tags.
    pub tags: Option<Vec<String>>,
    /// Arbitrary metadata.
    pub attributes: Option<Map<String, Value>>,
}

/// Aggregate snapshot returned by `GET /api/dashboard/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDashboardStats {
    /// Number of rules.
    pub total_rules: u64,
    /// Number of enabled rules.
    pub active_rules: u64,
    /// Number of disabled rules.
    pub disabled_rules: u64,
    /// Number of distinct rule sets.
    pub total_rule_sets: u64,
    /// Time the snapshot was taken.
    pub last_updated: DateTime<Utc>,
}

/// Body returned by `DELETE /api/rules?ruleSetId=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDeletedRules {
    /// Number of rules removed.
    pub deleted_count: u64,
}

/// Error payload the backend attaches to non-success responses.
///
/// Every field is optional so that partial bodies still decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiErrorBody {
    /// HTTP status echoed by the backend.
    pub status: Option<u16>,
    /// Short reason phrase.
    pub error: Option<String>,
    /// Human-readable message shown in the error banner.
    pub message: Option<String>,
    /// Request path that failed.
    pub path: Option<String>,
    /// Per-field validation messages.
    pub details: Option<Vec<String>>,
}

/// One band inside a create/update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateBandRequest {
    /// Window length in seconds.
    pub window_seconds: u64,
    /// Requests allowed per window.
    pub capacity: u64,
    /// Display label.
    pub label: String,
}

/// Body of `POST /api/rules`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRuleRequest {
    /// Id of the new rule.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the rule starts enforced.
    pub enabled: bool,
    /// Scope name.
    pub scope: String,
    /// Key strategy id.
    pub key_strategy_id: String,
    /// Policy name.
    pub on_limit_exceed_policy: String,
    /// Limit bands.
    pub bands: Vec<RateBandRequest>,
    /// Owning rule set; omitted when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_set_id: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Arbitrary metadata.
    pub attributes: Map<String, Value>,
}

/// Body of `PUT /api/rules/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRuleRequest {
    /// Display name.
    pub name: String,
    /// Whether the rule is enforced.
    pub enabled: bool,
    /// Scope name.
    pub scope: String,
    /// Key strategy id.
    pub key_strategy_id: String,
    /// Policy name.
    pub on_limit_exceed_policy: String,
    /// Limit bands.
    pub bands: Vec<RateBandRequest>,
    /// Owning rule set; omitted when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_set_id: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Arbitrary metadata.
    pub attributes: Map<String, Value>,
}
