use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;
use fluxgate_application::{DeletedRules, RuleRepository};
use fluxgate_core::{AppError, AppResult};
use fluxgate_domain::{DashboardStats, Rule, RuleDraft};
use tokio::sync::RwLock;

/// In-memory rule repository with the backend's admin semantics.
///
/// Rules keep insertion order. Used for offline sessions and tests.
#[derive(Debug, Default)]
pub struct InMemoryRuleRepository {
    rules: RwLock<Vec<Rule>>,
}

impl InMemoryRuleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository preloaded with rules.
    #[must_use]
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self {
            rules: RwLock::new(rules),
        }
    }
}

fn rule_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("rule '{id}'"))
}

fn count(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[async_trait]
impl RuleRepository for InMemoryRuleRepository {
    async fn list_rules(&self, rule_set_id: Option<&str>) -> AppResult<Vec<Rule>> {
        let rules = self.rules.read().await;
        Ok(rules
            .iter()
            .filter(|rule| {
                rule_set_id.is_none_or(|rule_set_id| rule.rule_set_id.as_deref() == Some(rule_set_id))
            })
            .cloned()
            .collect())
    }

    async fn get_rule(&self, id: &str) -> AppResult<Rule> {
        self.rules
            .read()
            .await
            .iter()
            .find(|rule| rule.id == id)
            .cloned()
            .ok_or_else(|| rule_not_found(id))
    }

    async fn create_rule(&self, draft: &RuleDraft) -> AppResult<Rule> {
        let rule = draft.resolve();
        rule.validate()?;

        let mut rules = self.rules.write().await;
        if rules.iter().any(|existing| existing.id == rule.id) {
            return Err(AppError::Conflict(format!(
                "rule '{}' already exists",
                rule.id
            )));
        }

        rules.push(rule.clone());
        Ok(rule)
    }

    async fn update_rule(&self, id: &str, draft: &RuleDraft) -> AppResult<Rule> {
        let mut rule = draft.resolve();
        rule.id = id.to_owned();
        rule.validate()?;

        let mut rules = self.rules.write().await;
        let slot = rules
            .iter_mut()
            .find(|existing| existing.id == id)
            .ok_or_else(|| rule_not_found(id))?;
        *slot = rule.clone();
        Ok(rule)
    }

    async fn delete_rule(&self, id: &str) -> AppResult<()> {
        let mut rules = self.rules.write().await;
        let position = rules
            .iter()
            .position(|rule| rule.id == id)
            .ok_or_else(|| rule_not_found(id))?;
        rules.remove(position);
        Ok(())
    }

    async fn toggle_rule(&self, id: &str) -> AppResult<Rule> {
        let mut rules = self.rules.write().await;
        let rule = rules
            .iter_mut()
            .find(|rule| rule.id == id)
            .ok_or_else(|| rule_not_found(id))?;
        rule.enabled = !rule.enabled;
        Ok(rule.clone())
    }

    async fn delete_rules_by_rule_set(&self, rule_set_id: &str) -> AppResult<DeletedRules> {
        let mut rules = self.rules.write().await;
        let before = rules.len();
        rules.retain(|rule| rule.rule_set_id.as_deref() != Some(rule_set_id));
        Ok(DeletedRules {
            deleted_count: count(before - rules.len()),
        })
    }

    async fn get_stats(&self) -> AppResult<DashboardStats> {
        let rules = self.rules.read().await;
        let active = rules.iter().filter(|rule| rule.enabled).count();
        let rule_sets: BTreeSet<&str> = rules
            .iter()
            .filter_map(|rule| rule.rule_set_id.as_deref())
            .filter(|rule_set_id| !rule_set_id.is_empty())
            .collect();

        Ok(DashboardStats {
            total_rules: count(rules.len()),
            active_rules: count(active),
            disabled_rules: count(rules.len() - active),
            total_rule_sets: count(rule_sets.len()),
            last_updated: Utc::now(),
        })
    }
}
