use async_trait::async_trait;

/// Source of the bearer credential attached to backend calls.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Returns the access token for the next request, or `None` when the
    /// request should go out unauthenticated.
    async fn bearer_token(&self) -> Option<String>;
}
