use fluxgate_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Scope applied when a draft does not name one.
pub const DEFAULT_RULE_SCOPE: RuleScope = RuleScope::PerIp;

/// Key strategy applied when a draft does not name one.
pub const DEFAULT_KEY_STRATEGY_ID: &str = "ip";

/// Policy applied when a draft does not name one.
pub const DEFAULT_LIMIT_EXCEED_POLICY: LimitExceedPolicy = LimitExceedPolicy::RejectRequest;

/// Dimension along which the backend partitions rate-limit counters.
///
/// Values the client does not know are kept verbatim in `Unrecognized` so a
/// rule fetched from a newer backend survives a read/write cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleScope {
    /// One counter per client IP address.
    PerIp,
    /// One counter per authenticated user.
    PerUser,
    /// One counter per API key.
    PerApiKey,
    /// One counter shared by every request.
    Global,
    /// Backend-defined custom partitioning.
    Custom,
    /// A value this client does not know.
    Unrecognized(String),
}

impl RuleScope {
    /// Returns stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::PerIp => "PER_IP",
            Self::PerUser => "PER_USER",
            Self::PerApiKey => "PER_API_KEY",
            Self::Global => "GLOBAL",
            Self::Custom => "CUSTOM",
            Self::Unrecognized(value) => value.as_str(),
        }
    }

    /// Returns whether this is one of the known scopes.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for RuleScope {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PER_IP" => Self::PerIp,
            "PER_USER" => Self::PerUser,
            "PER_API_KEY" => Self::PerApiKey,
            "GLOBAL" => Self::Global,
            "CUSTOM" => Self::Custom,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<RuleScope> for String {
    fn from(value: RuleScope) -> Self {
        match value {
            RuleScope::Unrecognized(value) => value,
            known => known.as_str().to_owned(),
        }
    }
}

/// Behavior when a band's capacity is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LimitExceedPolicy {
    /// Reject the request immediately.
    RejectRequest,
    /// Delay the request until the band refills.
    WaitForRefill,
    /// A value this client does not know.
    Unrecognized(String),
}

impl LimitExceedPolicy {
    /// Returns stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::RejectRequest => "REJECT_REQUEST",
            Self::WaitForRefill => "WAIT_FOR_REFILL",
            Self::Unrecognized(value) => value.as_str(),
        }
    }

    /// Returns whether this is one of the known policies.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for LimitExceedPolicy {
    fn from(value: String) -> Self {
        match value.as_str() {
            "REJECT_REQUEST" => Self::RejectRequest,
            "WAIT_FOR_REFILL" => Self::WaitForRefill,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<LimitExceedPolicy> for String {
    fn from(value: LimitExceedPolicy) -> Self {
        match value {
            LimitExceedPolicy::Unrecognized(value) => value,
            known => known.as_str().to_owned(),
        }
    }
}

/// One capacity/window pair within a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateBand {
    /// Window duration in seconds.
    pub window_seconds: u64,
    /// Maximum permitted units in the window.
    pub capacity: u64,
    /// Free-text label, empty when the backend sent none.
    #[serde(default)]
    pub label: String,
}

impl RateBand {
    /// Creates a band.
    #[must_use]
    pub fn new(window_seconds: u64, capacity: u64, label: impl Into<String>) -> Self {
        Self {
            window_seconds,
            capacity,
            label: label.into(),
        }
    }
}

/// Client-side copy of a rate-limit rule owned by the backend.
///
/// Instances are built from backend responses without validation; call
/// [`Rule::validate`] before submitting one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Globally unique, immutable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the backend enforces the rule.
    pub enabled: bool,
    /// Counter partitioning dimension.
    pub scope: RuleScope,
    /// Backend key extraction strategy.
    pub key_strategy_id: String,
    /// Behavior once a band is exhausted.
    pub on_limit_exceed_policy: LimitExceedPolicy,
    /// Ordered capacity/window bands.
    pub bands: Vec<RateBand>,
    /// Optional rule set grouping.
    pub rule_set_id: Option<String>,
    /// Display tags, in backend order.
    pub tags: Vec<String>,
    /// Opaque attributes.
    pub attributes: Map<String, Value>,
}

impl Rule {
    /// Checks the invariants the backend enforces on submitted rules.
    pub fn validate(&self) -> AppResult<()> {
        validate_rule_id(self.id.as_str())?;
        NonEmptyString::new(self.name.as_str())
            .map_err(|_| AppError::Validation("rule name is required".to_owned()))?;
        NonEmptyString::new(self.key_strategy_id.as_str())
            .map_err(|_| AppError::Validation("keyStrategyId is required".to_owned()))?;

        if !self.scope.is_recognized() {
            return Err(AppError::Validation(format!(
                "scope must be one of: GLOBAL, PER_API_KEY, PER_USER, PER_IP, CUSTOM, got '{}'",
                self.scope.as_str()
            )));
        }

        if !self.on_limit_exceed_policy.is_recognized() {
            return Err(AppError::Validation(format!(
                "onLimitExceedPolicy must be one of: REJECT_REQUEST, WAIT_FOR_REFILL, got '{}'",
                self.on_limit_exceed_policy.as_str()
            )));
        }

        if self.bands.is_empty() {
            return Err(AppError::Validation(
                "rules require at least one band".to_owned(),
            ));
        }

        for (index, band) in self.bands.iter().enumerate() {
            if band.window_seconds == 0 {
                return Err(AppError::Validation(format!(
                    "band {index} windowSeconds must be at least 1"
                )));
            }
            if band.capacity == 0 {
                return Err(AppError::Validation(format!(
                    "band {index} capacity must be at least 1"
                )));
            }
        }

        Ok(())
    }

    /// Case-insensitive substring match over name and id.
    ///
    /// An empty query matches every rule.
    #[must_use]
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(query.as_str())
            || self.id.to_lowercase().contains(query.as_str())
    }
}

/// Partial rule as edited in a form: an id plus any subset of fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleDraft {
    /// Rule identifier; the path id for updates.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Enabled flag.
    pub enabled: Option<bool>,
    /// Counter partitioning dimension.
    pub scope: Option<RuleScope>,
    /// Backend key extraction strategy.
    pub key_strategy_id: Option<String>,
    /// Behavior once a band is exhausted.
    pub on_limit_exceed_policy: Option<LimitExceedPolicy>,
    /// Capacity/window bands.
    pub bands: Option<Vec<RateBand>>,
    /// Rule set grouping.
    pub rule_set_id: Option<String>,
    /// Display tags.
    pub tags: Option<Vec<String>>,
    /// Opaque attributes.
    pub attributes: Option<Map<String, Value>>,
}

impl RuleDraft {
    /// Creates an empty draft for the given id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Fills every absent field with its default and returns the full rule.
    ///
    /// Empty key strategy and rule set ids count as absent.
    #[must_use]
    pub fn resolve(&self) -> Rule {
        Rule {
            id: self.id.clone(),
            name: self.name.clone().unwrap_or_default(),
            enabled: self.enabled.unwrap_or(true),
            scope: self.scope.clone().unwrap_or(DEFAULT_RULE_SCOPE),
            key_strategy_id: self
                .key_strategy_id
                .clone()
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_KEY_STRATEGY_ID.to_owned()),
            on_limit_exceed_policy: self
                .on_limit_exceed_policy
                .clone()
                .unwrap_or(DEFAULT_LIMIT_EXCEED_POLICY),
            bands: self.bands.clone().unwrap_or_default(),
            rule_set_id: self.rule_set_id.clone().filter(|value| !value.is_empty()),
            tags: self.tags.clone().unwrap_or_default(),
            attributes: self.attributes.clone().unwrap_or_default(),
        }
    }
}

impl From<Rule> for RuleDraft {
    fn from(rule: Rule) -> Self {
        Self {
            id: rule.id,
            name: Some(rule.name),
            enabled: Some(rule.enabled),
            scope: Some(rule.scope),
            key_strategy_id: Some(rule.key_strategy_id),
            on_limit_exceed_policy: Some(rule.on_limit_exceed_policy),
            bands: Some(rule.bands),
            rule_set_id: rule.rule_set_id,
            tags: Some(rule.tags),
            attributes: Some(rule.attributes),
        }
    }
}

fn validate_rule_id(id: &str) -> AppResult<()> {
    if id.is_empty() {
        return Err(AppError::Validation("rule id is required".to_owned()));
    }

    if !id
        .chars()
        .all(|character| character.is_ascii_alphanumeric() || matches!(character, '-' | '_'))
    {
        return Err(AppError::Validation(format!(
            "rule id '{id}' must contain only alphanumeric characters, hyphens, and underscores"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_rule(id: &str, name: &str) -> Rule {
        RuleDraft {
            name: Some(name.to_owned()),
            bands: Some(vec![RateBand::new(60, 100, "100-per-minute")]),
            ..RuleDraft::new(id)
        }
        .resolve()
    }

    #[test]
    fn empty_draft_resolves_to_defaults() {
        let rule = RuleDraft::new("x").resolve();

        assert_eq!(rule.id, "x");
        assert_eq!(rule.name, "");
        assert!(rule.enabled);
        assert_eq!(rule.scope, RuleScope::PerIp);
        assert_eq!(rule.key_strategy_id, "ip");
        assert_eq!(rule.on_limit_exceed_policy, LimitExceedPolicy::RejectRequest);
        assert!(rule.bands.is_empty());
        assert!(rule.tags.is_empty());
        assert!(rule.attributes.is_empty());
        assert_eq!(rule.rule_set_id, None);
    }

    #[test]
    fn empty_strings_count_as_absent_in_draft() {
        let rule = RuleDraft {
            key_strategy_id: Some(String::new()),
            rule_set_id: Some(String::new()),
            ..RuleDraft::new("x")
        }
        .resolve();

        assert_eq!(rule.key_strategy_id, "ip");
        assert_eq!(rule.rule_set_id, None);
    }

    #[test]
    fn draft_from_rule_resolves_back_to_same_rule() {
        let mut rule = sample_rule("api-limits", "Public API Limits");
        rule.rule_set_id = Some("production".to_owned());
        rule.tags = vec!["public-api".to_owned()];

        assert_eq!(RuleDraft::from(rule.clone()).resolve(), rule);
    }

    #[test]
    fn unknown_scope_survives_serialization() {
        let scope: RuleScope = serde_json::from_value(json!("PER_TENANT"))
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(scope, RuleScope::Unrecognized("PER_TENANT".to_owned()));
        assert_eq!(serde_json::to_value(&scope).ok(), Some(json!("PER_TENANT")));
    }

    #[test]
    fn known_policy_parses_from_wire_value() {
        let policy: LimitExceedPolicy = serde_json::from_value(json!("WAIT_FOR_REFILL"))
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(policy, LimitExceedPolicy::WaitForRefill);
    }

    #[test]
    fn valid_rule_passes_validation() {
        assert!(sample_rule("api-limits", "Public API Limits").validate().is_ok());
    }

    #[test]
    fn rule_without_bands_is_rejected() {
        let mut rule = sample_rule("api-limits", "Public API Limits");
        rule.bands.clear();
        assert!(matches!(rule.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn zero_capacity_band_is_rejected() {
        let mut rule = sample_rule("api-limits", "Public API Limits");
        rule.bands.push(RateBand::new(1, 0, ""));
        assert!(rule.validate().is_err());
    }

    #[test]
    fn zero_window_band_is_rejected() {
        let mut rule = sample_rule("api-limits", "Public API Limits");
        rule.bands[0].window_seconds = 0;
        assert!(rule.validate().is_err());
    }

    #[test]
    fn rule_id_with_spaces_is_rejected() {
        assert!(sample_rule("api limits", "Public API Limits").validate().is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(sample_rule("api-limits", "   ").validate().is_err());
    }

    #[test]
    fn unrecognized_scope_is_rejected_on_submit() {
        let mut rule = sample_rule("api-limits", "Public API Limits");
        rule.scope = RuleScope::Unrecognized("PER_TENANT".to_owned());
        assert!(rule.validate().is_err());
    }

    #[test]
    fn search_matches_name_and_id_case_insensitively() {
        let rule = sample_rule("auth-limits", "Authentication Rate Limit");

        assert!(rule.matches_search("AUTH"));
        assert!(rule.matches_search("rate limit"));
        assert!(rule.matches_search(""));
        assert!(!rule.matches_search("webhook"));
    }
}
