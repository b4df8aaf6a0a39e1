use std::path::PathBuf;

use fluxgate_core::AppError;
use fluxgate_domain::SimulationInput;

pub const USAGE: &str = "usage: fluxgate-console <command>

commands:
  stats                                 show dashboard counters
  list [ruleSetId]                      list rules, optionally for one rule set
  search <query>                        filter rules by name or id
  show <id>                             show one rule
  toggle <id>                           enable or disable a rule
  delete <id>                           delete a rule
  delete-rule-set <ruleSetId>           delete every rule in a rule set
  simulate <id> <burst> [key] [path]    simulate a request burst against a rule
  create <draft.json>                   create a rule from a JSON draft
  update <draft.json>                   update the rule named by the draft's id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Stats,
    List { rule_set_id: Option<String> },
    Search { query: String },
    Show { id: String },
    Toggle { id: String },
    Delete { id: String },
    DeleteRuleSet { rule_set_id: String },
    Simulate { id: String, input: SimulationInput },
    Create { draft_path: PathBuf },
    Update { draft_path: PathBuf },
}

impl ConsoleCommand {
    /// Parses the arguments following the program name.
    pub fn parse<I>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let command = args
            .next()
            .ok_or_else(|| AppError::Validation("missing command".to_owned()))?;
        let mut operand = |name: &str| {
            args.next()
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AppError::Validation(format!("{command} requires <{name}>")))
        };

        let parsed = match command.as_str() {
            "stats" => Self::Stats,
            "list" => Self::List {
                rule_set_id: operand("ruleSetId").ok(),
            },
            "search" => Self::Search {
                query: operand("query")?,
            },
            "show" => Self::Show {
                id: operand("id")?,
            },
            "toggle" => Self::Toggle {
                id: operand("id")?,
            },
            "delete" => Self::Delete {
                id: operand("id")?,
            },
            "delete-rule-set" => Self::DeleteRuleSet {
                rule_set_id: operand("ruleSetId")?,
            },
            "simulate" => {
                let id = operand("id")?;
                let burst = operand("burst")?;
                let burst = burst.parse::<u64>().map_err(|error| {
                    AppError::Validation(format!("invalid burst '{burst}': {error}"))
                })?;
                let defaults = SimulationInput::default();
                Self::Simulate {
                    id,
                    input: SimulationInput {
                        key: operand("key").unwrap_or(defaults.key),
                        path: operand("path").unwrap_or(defaults.path),
                        burst,
                    },
                }
            }
            "create" => Self::Create {
                draft_path: PathBuf::from(operand("draft.json")?),
            },
            "update" => Self::Update {
                draft_path: PathBuf::from(operand("draft.json")?),
            },
            other => {
                return Err(AppError::Validation(format!("unknown command '{other}'")));
            }
        };

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ConsoleCommand, AppError> {
        ConsoleCommand::parse(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn list_takes_optional_rule_set() {
        assert!(matches!(
            parse(&["list"]),
            Ok(ConsoleCommand::List { rule_set_id: None })
        ));
        assert_eq!(
            parse(&["list", "production"]).ok(),
            Some(ConsoleCommand::List {
                rule_set_id: Some("production".to_owned())
            })
        );
    }

    #[test]
    fn simulate_fills_default_key_and_path() {
        let command = parse(&["simulate", "api-limits", "150"])
            .unwrap_or_else(|error| panic!("simulate should parse: {error}"));

        assert_eq!(
            command,
            ConsoleCommand::Simulate {
                id: "api-limits".to_owned(),
                input: SimulationInput {
                    burst: 150,
                    ..SimulationInput::default()
                },
            }
        );
    }

    #[test]
    fn simulate_accepts_key_and_path() {
        let command = parse(&["simulate", "auth-limits", "3", "10.0.0.7", "/login"]);

        assert!(matches!(
            command,
            Ok(ConsoleCommand::Simulate { ref input, .. })
                if input.key == "10.0.0.7" && input.path == "/login" && input.burst == 3
        ));
    }

    #[test]
    fn non_numeric_burst_is_rejected() {
        assert!(matches!(
            parse(&["simulate", "api-limits", "many"]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn missing_operand_names_it() {
        let result = parse(&["toggle"]);

        assert!(matches!(result, Err(AppError::Validation(ref message)) if message == "toggle requires <id>"));
    }

    #[test]
    fn unknown_and_missing_commands_are_rejected() {
        assert!(parse(&["purge"]).is_err());
        assert!(parse(&[]).is_err());
    }
}
