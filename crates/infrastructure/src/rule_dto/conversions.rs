use fluxgate_domain::{DashboardStats, RateBand, Rule, RuleDraft};

use super::types::{
    ApiDashboardStats, ApiRateBand, ApiRule, CreateRuleRequest, RateBandRequest,
    UpdateRuleRequest,
};

/// Maps a backend rule to the domain model without validating it.
///
/// Absent tags and attributes become empty; absent band labels become `""`.
#[must_use]
pub fn to_domain_rule(dto: ApiRule) -> Rule {
    Rule {
        id: dto.id,
        name: dto.name,
        enabled: dto.enabled,
        scope: dto.scope.into(),
        key_strategy_id: dto.key_strategy_id,
        on_limit_exceed_policy: dto.on_limit_exceed_policy.into(),
        bands: dto.bands.into_iter().map(RateBand::from).collect(),
        rule_set_id: dto.rule_set_id,
        tags: dto.tags.unwrap_or_default(),
        attributes: dto.attributes.unwrap_or_default(),
    }
}

/// Maps the backend stats snapshot to the domain model.
#[must_use]
pub fn to_domain_stats(dto: ApiDashboardStats) -> DashboardStats {
    DashboardStats {
        total_rules: dto.total_rules,
        active_rules: dto.active_rules,
        disabled_rules: dto.disabled_rules,
        total_rule_sets: dto.total_rule_sets,
        last_updated: dto.last_updated,
    }
}

/// Builds a create request, filling defaults for absent draft fields.
#[must_use]
pub fn to_create_request(draft: &RuleDraft) -> CreateRuleRequest {
    let rule = draft.resolve();
    CreateRuleRequest {
        id: rule.id,
        name: rule.name,
        enabled: rule.enabled,
        scope: rule.scope.into(),
        key_strategy_id: rule.key_strategy_id,
        on_limit_exceed_policy: rule.on_limit_exceed_policy.into(),
        bands: rule.bands.into_iter().map(RateBandRequest::from).collect(),
        rule_set_id: rule.rule_set_id,
        tags: rule.tags,
        attributes: rule.attributes,
    }
}

/// Builds an update request, filling defaults for absent draft fields.
#[must_use]
pub fn to_update_request(draft: &RuleDraft) -> UpdateRuleRequest {
    let CreateRuleRequest {
        id: _,
        name,
        enabled,
        scope,
        key_strategy_id,
        on_limit_exceed_policy,
        bands,
        rule_set_id,
        tags,
        attributes,
    } = to_create_request(draft);

    UpdateRuleRequest {
        name,
        enabled,
        scope,
        key_strategy_id,
        on_limit_exceed_policy,
        bands,
        rule_set_id,
        tags,
        attributes,
    }
}

impl From<ApiRule> for Rule {
    fn from(value: ApiRule) -> Self {
        to_domain_rule(value)
    }
}

impl From<ApiRateBand> for RateBand {
    fn from(value: ApiRateBand) -> Self {
        RateBand::new(
            value.window_seconds,
            value.capacity,
            value.label.unwrap_or_default(),
        )
    }
}

impl From<RateBand> for RateBandRequest {
    fn from(value: RateBand) -> Self {
        Self {
            window_seconds: value.window_seconds,
            capacity: value.capacity,
            label: value.label,
        }
    }
}

#[cfg(test)]
mod tests {
    use fluxgate_domain::{LimitExceedPolicy, RuleScope};
    use serde_json::{Value, json};

    use super::*;

    fn full_dto() -> ApiRule {
        serde_json::from_value(json!({
            "id": "user-api-limits",
            "name": "User API Limits",
            "enabled": false,
            "scope": "PER_USER",
            "keyStrategyId": "userId",
            "onLimitExceedPolicy": "WAIT_FOR_REFILL",
            "bands": [
                {"windowSeconds": 1, "capacity": 50, "label": "50-per-second"},
                {"windowSeconds": 60, "capacity": 500, "label": "500-per-minute"}
            ],
            "ruleSetId": "production",
            "tags": ["user-api", "premium"],
            "attributes": {"tier": "gold", "weight": 3}
        }))
        .unwrap_or_else(|error| panic!("fixture should decode: {error}"))
    }

    #[test]
    fn domain_rule_copies_scalar_fields() {
        let rule = to_domain_rule(full_dto());

        assert_eq!(rule.id, "user-api-limits");
        assert!(!rule.enabled);
        assert_eq!(rule.scope, RuleScope::PerUser);
        assert_eq!(rule.on_limit_exceed_policy, LimitExceedPolicy::WaitForRefill);
        assert_eq!(rule.bands[1], RateBand::new(60, 500, "500-per-minute"));
        assert_eq!(rule.rule_set_id.as_deref(), Some("production"));
        assert_eq!(rule.attributes.get("weight"), Some(&json!(3)));
    }

    #[test]
    fn absent_optional_fields_get_defaults() {
        let dto: ApiRule = serde_json::from_value(json!({
            "id": "bare",
            "name": "Bare",
            "enabled": true,
            "scope": "GLOBAL",
            "keyStrategyId": "global",
            "onLimitExceedPolicy": "REJECT_REQUEST",
            "bands": [{"windowSeconds": 60, "capacity": 5, "label": null}],
            "ruleSetId": null
        }))
        .unwrap_or_else(|error| panic!("fixture should decode: {error}"));

        let rule = to_domain_rule(dto);

        assert!(rule.tags.is_empty());
        assert!(rule.attributes.is_empty());
        assert_eq!(rule.bands[0].label, "");
        assert_eq!(rule.rule_set_id, None);
    }

    #[test]
    fn unknown_enumerations_pass_through_mapping() {
        let mut dto = full_dto();
        dto.scope = "PER_TENANT".to_owned();

        let rule = to_domain_rule(dto);
        let request = to_update_request(&RuleDraft::from(rule));

        assert_eq!(request.scope, "PER_TENANT");
    }

    #[test]
    fn update_request_round_trips_populated_dto() {
        let dto = full_dto();
        let request = to_update_request(&RuleDraft::from(to_domain_rule(dto.clone())));

        assert_eq!(request.name, dto.name);
        assert_eq!(request.enabled, dto.enabled);
        assert_eq!(request.scope, dto.scope);
        assert_eq!(request.key_strategy_id, dto.key_strategy_id);
        assert_eq!(request.on_limit_exceed_policy, dto.on_limit_exceed_policy);
        assert_eq!(request.rule_set_id, dto.rule_set_id);
        assert_eq!(Some(request.tags), dto.tags);
        assert_eq!(Some(request.attributes), dto.attributes);
        let bands: Vec<ApiRateBand> = request
            .bands
            .into_iter()
            .map(|band| ApiRateBand {
                window_seconds: band.window_seconds,
                capacity: band.capacity,
                label: Some(band.label),
            })
            .collect();
        assert_eq!(bands, dto.bands);
    }

    #[test]
    fn create_request_from_bare_draft_uses_defaults() {
        let request = to_create_request(&RuleDraft::new("x"));

        let encoded = serde_json::to_value(&request).unwrap_or(Value::Null);
        assert_eq!(
            encoded,
            json!({
                "id": "x",
                "name": "",
                "enabled": true,
                "scope": "PER_IP",
                "keyStrategyId": "ip",
                "onLimitExceedPolicy": "REJECT_REQUEST",
                "bands": [],
                "tags": [],
                "attributes": {}
            })
        );
    }

    #[test]
    fn explicit_false_enabled_is_kept() {
        let draft = RuleDraft {
            enabled: Some(false),
            ..RuleDraft::new("x")
        };

        assert!(!to_update_request(&draft).enabled);
    }

    #[test]
    fn stats_map_field_for_field() {
        let dto: ApiDashboardStats = serde_json::from_value(json!({
            "totalRules": 4,
            "activeRules": 3,
            "disabledRules": 1,
            "totalRuleSets": 2,
            "lastUpdated": "2025-01-15T10:30:00Z"
        }))
        .unwrap_or_else(|error| panic!("fixture should decode: {error}"));

        let stats = to_domain_stats(dto);

        assert_eq!(stats.total_rules, 4);
        assert_eq!(stats.disabled_rules, 1);
        assert_eq!(stats.total_rule_sets, 2);
        assert_eq!(stats.last_updated.to_rfc3339(), "2025-01-15T10:30:00+00:00");
    }
}
