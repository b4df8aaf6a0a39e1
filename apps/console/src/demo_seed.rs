use fluxgate_domain::{LimitExceedPolicy, RateBand, Rule, RuleDraft, RuleScope};

struct SeedRule {
    id: &'static str,
    name: &'static str,
    enabled: bool,
    scope: RuleScope,
    key_strategy_id: &'static str,
    policy: LimitExceedPolicy,
    bands: &'static [(u64, u64, &'static str)],
    rule_set_id: &'static str,
    tags: &'static [&'static str],
}

const DEMO_RULES: [SeedRule; 4] = [
    SeedRule {
        id: "api-limits",
        name: "Public API Limits",
        enabled: true,
        scope: RuleScope::PerIp,
        key_strategy_id: "ip",
        policy: LimitExceedPolicy::RejectRequest,
        bands: &[
            (1, 10, "10-per-second"),
            (60, 100, "100-per-minute"),
            (3600, 1000, "1000-per-hour"),
        ],
        rule_set_id: "production",
        tags: &["public-api", "v1"],
    },
    SeedRule {
        id: "auth-limits",
        name: "Authentication Rate Limit",
        enabled: true,
        scope: RuleScope::PerIp,
        key_strategy_id: "ip",
        policy: LimitExceedPolicy::RejectRequest,
        bands: &[(60, 5, "5-per-minute"), (3600, 20, "20-per-hour")],
        rule_set_id: "production",
        tags: &["auth", "security"],
    },
    SeedRule {
        id: "user-api-limits",
        name: "User API Limits",
        enabled: true,
        scope: RuleScope::PerUser,
        key_strategy_id: "userId",
        policy: LimitExceedPolicy::WaitForRefill,
        bands: &[(1, 50, "50-per-second"), (60, 500, "500-per-minute")],
        rule_set_id: "production",
        tags: &["user-api", "premium"],
    },
    SeedRule {
        id: "webhook-limits",
        name: "Webhook Delivery",
        enabled: false,
        scope: RuleScope::PerApiKey,
        key_strategy_id: "apiKey",
        policy: LimitExceedPolicy::WaitForRefill,
        bands: &[(1, 100, "100-per-second")],
        rule_set_id: "development",
        tags: &["webhook", "integration"],
    },
];

/// Rules loaded into the in-memory backend.
pub fn demo_rules() -> Vec<Rule> {
    DEMO_RULES
        .iter()
        .map(|seed| {
            RuleDraft {
                name: Some(seed.name.to_owned()),
                enabled: Some(seed.enabled),
                scope: Some(seed.scope.clone()),
                key_strategy_id: Some(seed.key_strategy_id.to_owned()),
                on_limit_exceed_policy: Some(seed.policy.clone()),
                bands: Some(
                    seed.bands
                        .iter()
                        .map(|(window_seconds, capacity, label)| {
                            RateBand::new(*window_seconds, *capacity, *label)
                        })
                        .collect(),
                ),
                rule_set_id: Some(seed.rule_set_id.to_owned()),
                tags: Some(seed.tags.iter().map(|tag| (*tag).to_owned()).collect()),
                ..RuleDraft::new(seed.id)
            }
            .resolve()
        })
        .collect()
}
