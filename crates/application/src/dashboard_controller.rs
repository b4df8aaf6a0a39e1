//! Dashboard state holder wiring the rule repository and simulator together.
//!
//! Mutations are never applied optimistically: the controller waits for the
//! backend's copy of the entity, splices it into the local list by id, and
//! refetches the stats snapshot.

use std::sync::Arc;

use fluxgate_core::AppError;
use fluxgate_domain::{
    DashboardStats, RateBand, Rule, RuleDraft, SimulationInput, SimulationResult, simulate,
};
use tracing::{info, warn};

use crate::rule_ports::RuleRepository;

/// Load lifecycle of the dashboard data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request succeeded.
    Success,
    /// The last request failed; see [`DashboardController::error`].
    Error,
}

/// Overlay currently shown above the rule list.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardPanel {
    /// No overlay.
    Closed,
    /// Create or edit form. Editing when a rule is selected.
    RuleForm,
    /// Simulation panel for the selected rule.
    Simulation {
        /// Last submitted input.
        input: SimulationInput,
        /// Result of the last run, discarded when the panel closes.
        result: Option<SimulationResult>,
    },
}

/// Holds the dashboard's UI state and orchestrates repository calls.
pub struct DashboardController {
    repository: Arc<dyn RuleRepository>,
    load_state: LoadState,
    rules: Vec<Rule>,
    stats: Option<DashboardStats>,
    error: Option<String>,
    search_query: String,
    selected_rule: Option<Rule>,
    panel: DashboardPanel,
}

impl DashboardController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new(repository: Arc<dyn RuleRepository>) -> Self {
        Self {
            repository,
            load_state: LoadState::Idle,
            rules: Vec::new(),
            stats: None,
            error: None,
            search_query: String::new(),
            selected_rule: None,
            panel: DashboardPanel::Closed,
        }
    }

    /// Returns the load lifecycle state.
    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Returns every loaded rule.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        self.rules.as_slice()
    }

    /// Returns the last stats snapshot.
    #[must_use]
    pub fn stats(&self) -> Option<&DashboardStats> {
        self.stats.as_ref()
    }

    /// Returns the error banner text.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the current search query.
    #[must_use]
    pub fn search_query(&self) -> &str {
        self.search_query.as_str()
    }

    /// Returns the rule selected for editing or simulation.
    #[must_use]
    pub fn selected_rule(&self) -> Option<&Rule> {
        self.selected_rule.as_ref()
    }

    /// Returns the open overlay.
    #[must_use]
    pub fn panel(&self) -> &DashboardPanel {
        &self.panel
    }

    /// Updates the search box. Filtering never touches the backend.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Returns loaded rules whose name or id contains the search query.
    #[must_use]
    pub fn filtered_rules(&self) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|rule| rule.matches_search(self.search_query.as_str()))
            .collect()
    }

    /// Clears the error banner.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Fetches rules and stats concurrently.
    ///
    /// Both must succeed; on failure previously loaded data is kept.
    pub async fn load(&mut self) {
        self.begin_request();

        let repository = Arc::clone(&self.repository);
        let loaded = tokio::try_join!(repository.list_rules(None), repository.get_stats());

        match loaded {
            Ok((rules, stats)) => {
                info!(rule_count = rules.len(), "dashboard loaded");
                self.rules = rules;
                self.stats = Some(stats);
                self.load_state = LoadState::Success;
            }
            Err(error) => self.record_failure("load dashboard", error),
        }
    }

    /// Flips a rule's enabled flag.
    pub async fn toggle_rule(&mut self, id: &str) {
        self.begin_request();

        let toggled = self.repository.toggle_rule(id).await;
        match toggled {
            Ok(rule) => {
                info!(rule_id = %rule.id, enabled = rule.enabled, "rule toggled");
                self.replace_rule(rule);
                self.refresh_stats().await;
            }
            Err(error) => self.record_failure("toggle rule", error),
        }
    }

    /// Deletes a rule.
    pub async fn delete_rule(&mut self, id: &str) {
        self.begin_request();

        let deleted = self.repository.delete_rule(id).await;
        match deleted {
            Ok(()) => {
                info!(rule_id = %id, "rule deleted");
                self.rules.retain(|rule| rule.id != id);
                if self
                    .selected_rule
                    .as_ref()
                    .is_some_and(|selected| selected.id == id)
                {
                    self.close_panel();
                }
                self.refresh_stats().await;
            }
            Err(error) => self.record_failure("delete rule", error),
        }
    }

    /// Deletes every rule in a rule set and returns the backend's count.
    pub async fn delete_rule_set(&mut self, rule_set_id: &str) -> Option<u64> {
        self.begin_request();

        let deleted = self.repository.delete_rules_by_rule_set(rule_set_id).await;
        match deleted {
            Ok(deleted) => {
                info!(
                    rule_set_id = %rule_set_id,
                    deleted_count = deleted.deleted_count,
                    "rule set deleted"
                );
                self.rules
                    .retain(|rule| rule.rule_set_id.as_deref() != Some(rule_set_id));
                self.refresh_stats().await;
                Some(deleted.deleted_count)
            }
            Err(error) => {
                self.record_failure("delete rule set", error);
                None
            }
        }
    }

    /// Opens an empty create form.
    pub fn open_create_form(&mut self) {
        self.selected_rule = None;
        self.panel = DashboardPanel::RuleForm;
    }

    /// Opens the edit form for a loaded rule.
    pub fn open_edit_form(&mut self, id: &str) {
        if self.select_rule(id) {
            self.panel = DashboardPanel::RuleForm;
        }
    }

    /// Returns the draft the open form starts from.
    #[must_use]
    pub fn form_draft(&self) -> Option<RuleDraft> {
        if self.panel != DashboardPanel::RuleForm {
            return None;
        }

        Some(match &self.selected_rule {
            Some(rule) => RuleDraft::from(rule.clone()),
            None => RuleDraft {
                bands: Some(vec![RateBand::new(60, 100, "")]),
                ..RuleDraft::new("")
            },
        })
    }

    /// Submits the form: updates the selected rule, or creates a new one.
    ///
    /// The draft is checked locally before any request is sent. A rule's id
    /// is fixed once created, so an edit always targets the selected rule.
    /// On success the form closes; on failure it stays open.
    pub async fn save_rule(&mut self, draft: RuleDraft) {
        let target_id = self.selected_rule.as_ref().map(|rule| rule.id.clone());
        if let Some(target_id) = &target_id
            && draft.id != *target_id
        {
            self.record_failure(
                "validate rule",
                AppError::Validation(format!(
                    "rule id cannot change from '{target_id}' to '{}'",
                    draft.id
                )),
            );
            return;
        }

        if let Err(error) = draft.resolve().validate() {
            self.record_failure("validate rule", error);
            return;
        }

        self.begin_request();

        let editing = target_id.is_some();
        let saved = match &target_id {
            Some(target_id) => self.repository.update_rule(target_id, &draft).await,
            None => self.repository.create_rule(&draft).await,
        };

        match saved {
            Ok(rule) => {
                info!(rule_id = %rule.id, editing, "rule saved");
                if editing {
                    self.replace_rule(rule);
                } else {
                    self.rules.push(rule);
                }
                self.refresh_stats().await;
                self.close_panel();
            }
            Err(error) => self.record_failure("save rule", error),
        }
    }

    /// Opens the simulation panel for a loaded rule.
    pub fn open_simulation(&mut self, id: &str) {
        if self.select_rule(id) {
            self.panel = DashboardPanel::Simulation {
                input: SimulationInput::default(),
                result: None,
            };
        }
    }

    /// Runs the burst approximation against the selected rule.
    ///
    /// Requires the simulation panel to be open.
    pub fn run_simulation(&mut self, input: SimulationInput) -> Option<&SimulationResult> {
        if !matches!(self.panel, DashboardPanel::Simulation { .. }) {
            self.record_failure(
                "run simulation",
                AppError::Validation("simulation panel is not open".to_owned()),
            );
            return None;
        }

        if input.burst == 0 {
            self.record_failure(
                "run simulation",
                AppError::Validation("burst count must be at least 1".to_owned()),
            );
            return None;
        }

        let Some(rule) = self.selected_rule.as_ref() else {
            self.record_failure(
                "run simulation",
                AppError::Validation("no rule selected for simulation".to_owned()),
            );
            return None;
        };

        let result = simulate(rule, input.burst);
        self.panel = DashboardPanel::Simulation {
            input,
            result: Some(result),
        };

        match &self.panel {
            DashboardPanel::Simulation { result, .. } => result.as_ref(),
            _ => None,
        }
    }

    /// Closes any overlay and clears the selection.
    pub fn close_panel(&mut self) {
        self.panel = DashboardPanel::Closed;
        self.selected_rule = None;
    }

    fn select_rule(&mut self, id: &str) -> bool {
        match self.rules.iter().find(|rule| rule.id == id) {
            Some(rule) => {
                self.selected_rule = Some(rule.clone());
                true
            }
            None => {
                self.record_failure(
                    "select rule",
                    AppError::NotFound(format!("rule '{id}' is not loaded")),
                );
                false
            }
        }
    }

    fn replace_rule(&mut self, rule: Rule) {
        if let Some(existing) = self.rules.iter_mut().find(|existing| existing.id == rule.id) {
            *existing = rule;
        }
    }

    async fn refresh_stats(&mut self) {
        let stats = self.repository.get_stats().await;
        match stats {
            Ok(stats) => {
                self.stats = Some(stats);
                self.load_state = LoadState::Success;
            }
            Err(error) => self.record_failure("refresh stats", error),
        }
    }

    fn begin_request(&mut self) {
        self.load_state = LoadState::Loading;
        self.error = None;
    }

    fn record_failure(&mut self, operation: &str, error: AppError) {
        warn!(operation, error = %error, "dashboard operation failed");
        self.error = Some(error.to_string());
        self.load_state = LoadState::Error;
    }
}
