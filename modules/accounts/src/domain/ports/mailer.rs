use async_trait::async_trait;

/// Outbound email port. One call, one email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_confirmation_code(&self, to: &str, code: &str) -> anyhow::Result<()>;
}
