//! Bearer credentials of the active session.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fluxgate_core::SessionTokens;
use tokio::sync::RwLock;
use tracing::debug;

use crate::session_ports::CredentialProvider;

/// Holds the tokens the identity provider issued for the signed-in user.
///
/// Tokens are handed out as-is. An expired access token is still sent, and
/// the backend's 401 surfaces as a session-expired error.
#[derive(Debug, Default)]
pub struct ActiveSession {
    tokens: RwLock<Option<SessionTokens>>,
}

impl ActiveSession {
    /// Creates a session from provider tokens.
    #[must_use]
    pub fn new(tokens: Option<SessionTokens>) -> Self {
        Self {
            tokens: RwLock::new(tokens),
        }
    }

    /// Creates a session without credentials.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Returns the current tokens.
    pub async fn tokens(&self) -> Option<SessionTokens> {
        self.tokens.read().await.clone()
    }

    /// Replaces the tokens after a new sign-in.
    pub async fn sign_in(&self, tokens: SessionTokens) {
        *self.tokens.write().await = Some(tokens);
    }

    /// Drops the tokens; later requests go out unauthenticated.
    pub async fn sign_out(&self) {
        *self.tokens.write().await = None;
    }

    /// Returns whether the access token is known to be expired at `now`.
    pub async fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.tokens
            .read()
            .await
            .as_ref()
            .is_some_and(|tokens| tokens.is_expired_at(now))
    }
}

#[async_trait]
impl CredentialProvider for ActiveSession {
    async fn bearer_token(&self) -> Option<String> {
        let tokens = self.tokens.read().await;
        let tokens = tokens.as_ref()?;
        if tokens.is_expired_at(Utc::now()) {
            debug!("access token has expired; the backend will reject it");
        }
        Some(tokens.access_token().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[tokio::test]
    async fn anonymous_session_has_no_bearer_token() {
        assert_eq!(ActiveSession::anonymous().bearer_token().await, None);
    }

    #[tokio::test]
    async fn access_token_is_handed_out() {
        let session = ActiveSession::new(Some(SessionTokens::new("access", None)));

        assert_eq!(session.bearer_token().await.as_deref(), Some("access"));
    }

    #[tokio::test]
    async fn expired_token_is_still_sent() {
        let now = Utc::now();
        let session = ActiveSession::new(Some(SessionTokens::new(
            "stale",
            Some(now - Duration::seconds(5)),
        )));

        assert!(session.is_expired_at(now).await);
        assert_eq!(session.bearer_token().await.as_deref(), Some("stale"));
    }

    #[tokio::test]
    async fn sign_in_and_sign_out_swap_credentials() {
        let session = ActiveSession::anonymous();

        session.sign_in(SessionTokens::new("fresh", None)).await;
        assert_eq!(session.bearer_token().await.as_deref(), Some("fresh"));

        session.sign_out().await;
        assert_eq!(session.tokens().await, None);
        assert_eq!(session.bearer_token().await, None);
    }
}
