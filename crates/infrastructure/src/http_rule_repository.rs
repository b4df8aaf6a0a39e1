use std::sync::Arc;

use async_trait::async_trait;
use fluxgate_application::{CredentialProvider, DeletedRules, RuleRepository};
use fluxgate_core::{AppError, AppResult};
use fluxgate_domain::{DashboardStats, Rule, RuleDraft};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::rule_dto::{
    ApiDashboardStats, ApiDeletedRules, ApiErrorBody, ApiRule, to_create_request, to_domain_rule,
    to_domain_stats, to_update_request,
};


/// HTTP adapter for the backend's rule administration API.
///
/// Every call is a single attempt. A bearer token is attached whenever the
/// credential provider has one.
pub struct HttpRuleRepository {
    http_client: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpRuleRepository {
    /// Creates a repository rooted at `base_url`.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        credentials: Arc<dyn CredentialProvider>,
    ) -> AppResult<Self> {
        let base_url = Url::parse(base_url).map_err(|error| {
            AppError::Validation(format!("invalid backend URL '{base_url}': {error}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "backend URL '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            http_client,
            base_url,
            credentials,
        })
    }

    /// Returns the backend root every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!("backend URL '{}' cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn rules_endpoint(&self, rule_set_id: Option<&str>) -> AppResult<Url> {
        let mut url = self.endpoint(&["api", "rules"])?;
        if let Some(rule_set_id) = rule_set_id {
            url.query_pairs_mut().append_pair("ruleSetId", rule_set_id);
        }
        Ok(url)
    }

    async fn send<F>(&self, build: F) -> AppResult<reqwest::Response>
    where
        F: FnOnce(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let mut builder = build(&self.http_client);
        if let Some(token) = self.credentials.bearer_token().await {
            builder = builder.bearer_auth(token);
        }

        let request = builder
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build request: {error}")))?;
        let method = request.method().clone();
        let url = request.url().clone();

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| AppError::Transport(error.to_string()))?;
        let status = response.status();
        debug!(%method, %url, status = status.as_u16(), "backend request completed");

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::SessionExpired);
        }

        Err(error_from_response(status, response).await)
    }

    async fn send_json<T, F>(&self, build: F) -> AppResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let response = self.send(build).await?;
        read_json(response).await?.ok_or_else(|| {
            AppError::Internal("backend returned no content where a body was expected".to_owned())
        })
    }
}

async fn error_from_response(status: StatusCode, response: reqwest::Response) -> AppError {
    let body = response.bytes().await.unwrap_or_default();
    let error_body: ApiErrorBody = serde_json::from_slice(&body).unwrap_or_default();
    let message = error_body
        .message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    AppError::Http {
        status: status.as_u16(),
        message,
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<Option<T>> {
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    let body = response
        .bytes()
        .await
        .map_err(|error| AppError::Transport(error.to_string()))?;
    serde_json::from_slice(&body)
        .map(Some)
        .map_err(|error| AppError::Internal(format!("failed to decode backend response: {error}")))
}

#[async_trait]
impl RuleRepository for HttpRuleRepository {
    async fn list_rules(&self, rule_set_id: Option<&str>) -> AppResult<Vec<Rule>> {
        let url = self.rules_endpoint(rule_set_id)?;
        let rules: Vec<ApiRule> = self.send_json(|client| client.get(url)).await?;
        Ok(rules.into_iter().map(to_domain_rule).collect())
    }

    async fn get_rule(&self, id: &str) -> AppResult<Rule> {
        let url = self.endpoint(&["api", "rules", id])?;
        let rule: ApiRule = self.send_json(|client| client.get(url)).await?;
        Ok(to_domain_rule(rule))
    }

    async fn create_rule(&self, draft: &RuleDraft) -> AppResult<Rule> {
        let url = self.endpoint(&["api", "rules"])?;
        let body = to_create_request(draft);
        let rule: ApiRule = self
            .send_json(|client| client.post(url).json(&body))
            .await?;
        Ok(to_domain_rule(rule))
    }

    async fn update_rule(&self, id: &str, draft: &RuleDraft) -> AppResult<Rule> {
        let url = self.endpoint(&["api", "rules", id])?;
        let body = to_update_request(draft);
        let rule: ApiRule = self.send_json(|client| client.put(url).json(&body)).await?;
        Ok(to_domain_rule(rule))
    }

    async fn delete_rule(&self, id: &str) -> AppResult<()> {
        let url = self.endpoint(&["api", "rules", id])?;
        self.send(|client| client.delete(url)).await?;
        Ok(())
    }

    async fn toggle_rule(&self, id: &str) -> AppResult<Rule> {
        let url = self.endpoint(&["api", "rules", id, "toggle"])?;
        let rule: ApiRule = self.send_json(|client| client.patch(url)).await?;
        Ok(to_domain_rule(rule))
    }

    async fn delete_rules_by_rule_set(&self, rule_set_id: &str) -> AppResult<DeletedRules> {
        let url = self.rules_endpoint(Some(rule_set_id))?;
        let deleted: ApiDeletedRules = self.send_json(|client| client.delete(url)).await?;
        Ok(DeletedRules {
            deleted_count: deleted.deleted_count,
        })
    }

    async fn get_stats(&self) -> AppResult<DashboardStats> {
        let url = self.endpoint(&["api", "dashboard", "stats"])?;
        let stats: ApiDashboardStats = self.send_json(|client| client.get(url)).await?;
        Ok(to_domain_stats(stats))
    }
}
