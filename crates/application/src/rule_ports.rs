use async_trait::async_trait;
use fluxgate_core::AppResult;
use fluxgate_domain::{DashboardStats, Rule, RuleDraft};

/// Result of a bulk delete by rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletedRules {
    /// Number of rules the backend removed.
    pub deleted_count: u64,
}

/// Repository port for the backend's rule administration API.
///
/// Every call is a single attempt; implementations never retry.
#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// Lists rules, optionally restricted to one rule set.
    async fn list_rules(&self, rule_set_id: Option<&str>) -> AppResult<Vec<Rule>>;

    /// Fetches one rule by id.
    async fn get_rule(&self, id: &str) -> AppResult<Rule>;

    /// Creates a rule from a draft, filling defaults for absent fields.
    async fn create_rule(&self, draft: &RuleDraft) -> AppResult<Rule>;

    /// Replaces the rule `id` with the draft, filling defaults for absent fields.
    async fn update_rule(&self, id: &str, draft: &RuleDraft) -> AppResult<Rule>;

    /// Deletes one rule.
    async fn delete_rule(&self, id: &str) -> AppResult<()>;

    /// Flips the rule's enabled flag server-side and returns the result.
    async fn toggle_rule(&self, id: &str) -> AppResult<Rule>;

    /// Deletes every rule in a rule set.
    async fn delete_rules_by_rule_set(&self, rule_set_id: &str) -> AppResult<DeletedRules>;

    /// Fetches the aggregate dashboard snapshot.
    async fn get_stats(&self) -> AppResult<DashboardStats>;
}
