//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_rule_repository;
mod in_memory_rule_repository;
pub mod rule_dto;

pub use http_rule_repository::HttpRuleRepository;
pub use in_memory_rule_repository::InMemoryRuleRepository;
