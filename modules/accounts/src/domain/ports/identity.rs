use async_trait::async_trait;
use uuid::Uuid;

/// Account record as known to the managed identity service.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityAccount {
    pub uid: Uuid,
    pub email: String,
}

/// Decoded bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    pub subject: Uuid,
}

/// Transport-agnostic port for the external identity service. The identity
/// service is the single owner of credentials; nothing in this crate ever
/// stores or compares a password hash.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Look up an account by email. `Ok(None)` when the email is unknown.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<IdentityAccount>>;

    /// Create a credential record; the service mints the uid.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> anyhow::Result<IdentityAccount>;

    /// Verify credentials. `Ok(None)` covers both unknown email and wrong
    /// password so callers cannot distinguish the two.
    async fn verify_password(
        &self,
        email: &str,
        password: &str,
    ) -> anyhow::Result<Option<IdentityAccount>>;

    async fn update_password(&self, uid: Uuid, new_password: &str) -> anyhow::Result<()>;

    async fn update_email(&self, uid: Uuid, new_email: &str) -> anyhow::Result<()>;

    /// Decode and verify a bearer token. `Ok(None)` when invalid or expired.
    async fn verify_token(&self, token: &str) -> anyhow::Result<Option<TokenClaims>>;

    async fn delete_account(&self, uid: Uuid) -> anyhow::Result<()>;
}
