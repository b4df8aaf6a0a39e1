//! Application services and ports.

#![forbid(unsafe_code)]

mod dashboard_controller;
mod rule_ports;
mod session_ports;
mod session_service;

pub use dashboard_controller::{DashboardController, DashboardPanel, LoadState};
pub use rule_ports::{DeletedRules, RuleRepository};
pub use session_ports::CredentialProvider;
pub use session_service::ActiveSession;
