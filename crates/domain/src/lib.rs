//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod dashboard;
mod rule;
mod simulation;

pub use dashboard::DashboardStats;
pub use rule::{
    DEFAULT_KEY_STRATEGY_ID, DEFAULT_LIMIT_EXCEED_POLICY, DEFAULT_RULE_SCOPE, LimitExceedPolicy,
    RateBand, Rule, RuleDraft, RuleScope,
};
pub use simulation::{
    BandSimulation, SIMULATION_REFERENCE_CAPACITY, SimulationInput, SimulationResult, simulate,
};
