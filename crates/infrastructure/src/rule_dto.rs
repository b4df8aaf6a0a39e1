//! Wire representation of the rule administration API and its mapping to
//! domain types.

mod conversions;
mod types;

pub use conversions::{to_create_request, to_domain_rule, to_domain_stats, to_update_request};
pub use types::{
    ApiDashboardStats, ApiDeletedRules, ApiErrorBody, ApiRateBand, ApiRule, CreateRuleRequest,
    RateBandRequest, UpdateRuleRequest,
};
