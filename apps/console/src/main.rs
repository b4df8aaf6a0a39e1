//! Fluxgate rule administration console.

#![forbid(unsafe_code)]

mod console_command;
mod console_config;
mod demo_seed;
mod render;

use std::env;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;

use fluxgate_application::{ActiveSession, DashboardController, RuleRepository};
use fluxgate_core::{AppError, AppResult};
use fluxgate_domain::RuleDraft;
use fluxgate_infrastructure::{HttpRuleRepository, InMemoryRuleRepository};
use tracing::{info, warn};

use crate::console_command::{ConsoleCommand, USAGE};
use crate::console_config::{BackendMode, ConsoleConfig, init_tracing};
use crate::render::Renderer;

struct Backend {
    repository: Arc<dyn RuleRepository>,
    session: Option<Arc<ActiveSession>>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let command = match ConsoleCommand::parse(env::args().skip(1)) {
        Ok(command) => command,
        Err(error) => {
            eprintln!("{error}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let config = match ConsoleConfig::load() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{}", Renderer::new(false).error_banner(&error.to_string()));
            return ExitCode::FAILURE;
        }
    };
    let renderer = Renderer::new(config.color);

    let backend = match build_backend(&config) {
        Ok(backend) => backend,
        Err(error) => {
            eprintln!("{}", renderer.error_banner(&error.to_string()));
            return ExitCode::FAILURE;
        }
    };

    let outcome = run(&backend, command, renderer).await;

    if let Some(session) = &backend.session
        && session.is_expired_at(Utc::now()).await
    {
        warn!("access token has expired; sign in again and update FLUXGATE_ACCESS_TOKEN");
    }

    match outcome {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{}", renderer.error_banner(&message));
            ExitCode::FAILURE
        }
    }
}

fn build_backend(config: &ConsoleConfig) -> AppResult<Backend> {
    match config.backend {
        BackendMode::Memory => {
            info!("using in-memory backend with demo rules");
            Ok(Backend {
                repository: Arc::new(InMemoryRuleRepository::with_rules(
                    demo_seed::demo_rules(),
                )),
                session: None,
            })
        }
        BackendMode::Http => {
            let session = Arc::new(ActiveSession::new(config.session_tokens.clone()));
            let repository =
                HttpRuleRepository::new(reqwest::Client::new(), &config.api_url, session.clone())?;
            info!(api_url = %repository.base_url(), "using HTTP backend");

            Ok(Backend {
                repository: Arc::new(repository),
                session: Some(session),
            })
        }
    }
}

async fn run(
    backend: &Backend,
    command: ConsoleCommand,
    renderer: Renderer,
) -> Result<String, String> {
    let mut controller = DashboardController::new(backend.repository.clone());
    controller.load().await;
    banner(&controller)?;

    match command {
        ConsoleCommand::Stats => controller
            .stats()
            .map(|stats| renderer.stats(stats))
            .ok_or_else(|| "stats unavailable".to_owned()),
        ConsoleCommand::List { rule_set_id: None } => Ok(renderer.rule_table(controller.rules())),
        ConsoleCommand::List {
            rule_set_id: Some(rule_set_id),
        } => {
            let rules = backend
                .repository
                .list_rules(Some(rule_set_id.as_str()))
                .await
                .map_err(|error| error.to_string())?;
            Ok(renderer.rule_table(&rules))
        }
        ConsoleCommand::Search { query } => {
            controller.set_search_query(query);
            let rules: Vec<_> = controller.filtered_rules().into_iter().cloned().collect();
            Ok(renderer.rule_table(&rules))
        }
        ConsoleCommand::Show { id } => {
            let rule = backend
                .repository
                .get_rule(id.as_str())
                .await
                .map_err(|error| error.to_string())?;
            Ok(renderer.rule_detail(&rule))
        }
        ConsoleCommand::Toggle { id } => {
            controller.toggle_rule(id.as_str()).await;
            banner(&controller)?;
            rule_detail(&controller, id.as_str(), renderer)
        }
        ConsoleCommand::Delete { id } => {
            controller.delete_rule(id.as_str()).await;
            banner(&controller)?;
            Ok(format!("Deleted rule {id}"))
        }
        ConsoleCommand::DeleteRuleSet { rule_set_id } => {
            let deleted = controller.delete_rule_set(rule_set_id.as_str()).await;
            banner(&controller)?;
            Ok(format!(
                "Deleted {} rules from rule set {rule_set_id}",
                deleted.unwrap_or(0)
            ))
        }
        ConsoleCommand::Simulate { id, input } => {
            controller.open_simulation(id.as_str());
            banner(&controller)?;
            let rule = controller
                .selected_rule()
                .cloned()
                .ok_or_else(|| format!("unknown rule {id}"))?;
            let result = controller.run_simulation(input.clone()).cloned();
            banner(&controller)?;
            result
                .map(|result| renderer.simulation(&rule, &input, &result))
                .ok_or_else(|| "simulation produced no result".to_owned())
        }
        ConsoleCommand::Create { draft_path } => {
            let draft = read_draft(&draft_path).map_err(|error| error.to_string())?;
            let id = draft.id.clone();
            controller.open_create_form();
            controller.save_rule(draft).await;
            banner(&controller)?;
            rule_detail(&controller, id.as_str(), renderer)
        }
        ConsoleCommand::Update { draft_path } => {
            let draft = read_draft(&draft_path).map_err(|error| error.to_string())?;
            let id = draft.id.clone();
            controller.open_edit_form(id.as_str());
            banner(&controller)?;
            controller.save_rule(draft).await;
            banner(&controller)?;
            rule_detail(&controller, id.as_str(), renderer)
        }
    }
}

fn banner(controller: &DashboardController) -> Result<(), String> {
    match controller.error() {
        Some(message) => Err(message.to_owned()),
        None => Ok(()),
    }
}

fn rule_detail(controller: &DashboardController, id: &str, renderer: Renderer) -> Result<String, String> {
    controller
        .rules()
        .iter()
        .find(|rule| rule.id == id)
        .map(|rule| renderer.rule_detail(rule))
        .ok_or_else(|| format!("rule {id} is not loaded"))
}

fn read_draft(path: &Path) -> AppResult<RuleDraft> {
    let contents = fs::read_to_string(path).map_err(|error| {
        AppError::Validation(format!("failed to read draft '{}': {error}", path.display()))
    })?;
    serde_json::from_str(&contents).map_err(|error| {
        AppError::Validation(format!("invalid draft '{}': {error}", path.display()))
    })
}
