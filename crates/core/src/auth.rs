use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tokens issued by the identity provider for the active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    access_token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl SessionTokens {
    /// Creates a token set from provider data.
    #[must_use]
    pub fn new(access_token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// Returns the bearer access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.access_token.as_str()
    }

    /// Returns the access token expiry, if known.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns whether the access token is expired at `now`.
    ///
    /// Tokens without a known expiry never expire locally.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::SessionTokens;

    #[test]
    fn token_without_expiry_never_expires() {
        let tokens = SessionTokens::new("access", None);
        assert!(!tokens.is_expired_at(Utc::now()));
    }

    #[test]
    fn token_expires_at_its_deadline() {
        let now = Utc::now();
        let tokens = SessionTokens::new("access", Some(now));

        assert!(tokens.is_expired_at(now));
        assert!(!tokens.is_expired_at(now - Duration::seconds(1)));
    }
}
