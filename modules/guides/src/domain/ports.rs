use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{Guide, Personalization};

/// Port to the headless CMS. The upstream only filters by visibility and
/// relation; tag matching happens on our side.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn guides_for_relation(&self, relation: &str) -> anyhow::Result<Vec<Guide>>;
}

/// Port to whoever owns user personalization answers (the accounts module,
/// wired in the server binary).
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn personalization(&self, user_id: Uuid) -> anyhow::Result<Option<Personalization>>;
}
