use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::UserProfile;

/// Write-through port for the document store the mobile client still reads
/// directly. The relational store is authoritative; mirror failures must not
/// fail the request (callers log and continue), and the mirror is never
/// consulted for authentication.
#[async_trait]
pub trait ProfileMirror: Send + Sync {
    async fn upsert_profile(&self, profile: &UserProfile) -> anyhow::Result<()>;
    async fn delete_profile(&self, user_id: Uuid) -> anyhow::Result<()>;
}
