use std::env;

use chrono::{DateTime, Utc};
use fluxgate_core::{AppError, SessionTokens};
use tracing_subscriber::EnvFilter;

/// Where rule data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Http,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub backend: BackendMode,
    pub api_url: String,
    pub session_tokens: Option<SessionTokens>,
    pub color: bool,
}

impl ConsoleConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let backend = match optional("FLUXGATE_BACKEND")
            .unwrap_or_else(|| "http".to_owned())
            .to_ascii_lowercase()
            .as_str()
        {
            "http" => BackendMode::Http,
            "memory" => BackendMode::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "FLUXGATE_BACKEND must be either 'http' or 'memory', got '{other}'"
                )));
            }
        };

        let api_url =
            optional("FLUXGATE_API_URL").unwrap_or_else(|| "http://localhost:8090".to_owned());

        let expires_at = optional("FLUXGATE_TOKEN_EXPIRES_AT")
            .map(|value| parse_unix_seconds("FLUXGATE_TOKEN_EXPIRES_AT", &value))
            .transpose()?;
        let session_tokens = optional("FLUXGATE_ACCESS_TOKEN")
            .map(|access_token| SessionTokens::new(access_token, expires_at));

        let color = optional("FLUXGATE_COLOR")
            .map(|value| parse_bool("FLUXGATE_COLOR", &value))
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            backend,
            api_url,
            session_tokens,
            color,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_unix_seconds(name: &str, value: &str) -> Result<DateTime<Utc>, AppError> {
    let seconds = value
        .trim()
        .parse::<i64>()
        .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))?;
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| AppError::Validation(format!("{name} is out of range: {seconds}")))
}

fn parse_bool(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(AppError::Validation(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ConsoleConfig, AppError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ConsoleConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = load(&[]).unwrap_or_else(|error| panic!("defaults should load: {error}"));

        assert_eq!(config.backend, BackendMode::Http);
        assert_eq!(config.api_url, "http://localhost:8090");
        assert_eq!(config.session_tokens, None);
        assert!(!config.color);
    }

    #[test]
    fn session_tokens_carry_expiry() {
        let config = load(&[
            ("FLUXGATE_ACCESS_TOKEN", "access"),
            ("FLUXGATE_TOKEN_EXPIRES_AT", "1736937000"),
        ])
        .unwrap_or_else(|error| panic!("tokens should load: {error}"));

        let tokens = config
            .session_tokens
            .unwrap_or_else(|| panic!("tokens should be present"));
        assert_eq!(tokens.access_token(), "access");
        assert_eq!(
            tokens.expires_at().map(|expires_at| expires_at.timestamp()),
            Some(1_736_937_000)
        );
    }

    #[test]
    fn expiry_without_access_token_is_ignored() {
        let config = load(&[("FLUXGATE_TOKEN_EXPIRES_AT", "1736937000")])
            .unwrap_or_else(|error| panic!("config should load: {error}"));

        assert_eq!(config.session_tokens, None);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let result = load(&[("FLUXGATE_BACKEND", "postgres")]);

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn invalid_expiry_is_rejected() {
        let result = load(&[
            ("FLUXGATE_ACCESS_TOKEN", "access"),
            ("FLUXGATE_TOKEN_EXPIRES_AT", "tomorrow"),
        ]);

        assert!(matches!(result, Err(AppError::Validation(ref message)) if message.contains("FLUXGATE_TOKEN_EXPIRES_AT")));
    }

    #[test]
    fn memory_backend_and_color_parse() {
        let config = load(&[("FLUXGATE_BACKEND", "MEMORY"), ("FLUXGATE_COLOR", "true")])
            .unwrap_or_else(|error| panic!("config should load: {error}"));

        assert_eq!(config.backend, BackendMode::Memory);
        assert!(config.color);
    }
}
