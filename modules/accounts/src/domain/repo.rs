use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::contract::model::{
    EmailChangeRequest, FamilyLink, FamilyLinkStatus, Notification, UserProfile,
};

/// Outcome of attempting to open a new email change request.
#[derive(Debug, Clone, PartialEq)]
pub enum EmailChangeCreate {
    /// Stale unverified requests were removed and the new one persisted.
    Created,
    /// A recent unverified request exists; nothing was written.
    CooldownActive { since: DateTime<Utc> },
}

/// Port for the domain layer: persistence operations the accounts service
/// needs. Object-safe and async-friendly via `async_trait`.
///
/// The cooldown check in `create_email_change` and both multi-row deletes
/// (`finalize_email_change`, `delete_account_data`) are transactional inside
/// the implementation; the service never does a bare read-then-write for
/// those invariants.
#[async_trait]
pub trait AccountsRepository: Send + Sync {
    // --- profiles ---
    async fn insert_profile(&self, profile: UserProfile) -> anyhow::Result<()>;
    async fn find_profile(&self, id: Uuid) -> anyhow::Result<Option<UserProfile>>;
    async fn update_profile(&self, profile: UserProfile) -> anyhow::Result<()>;
    async fn set_avatar(&self, id: Uuid, key: &str, signed_url: &str) -> anyhow::Result<()>;

    // --- family links ---
    async fn find_link_by_code(&self, code: &str) -> anyhow::Result<Option<FamilyLink>>;
    async fn find_link_by_creator(&self, creator_id: Uuid) -> anyhow::Result<Option<FamilyLink>>;
    async fn find_link_by_id(&self, id: Uuid) -> anyhow::Result<Option<FamilyLink>>;
    async fn insert_link(&self, link: FamilyLink) -> anyhow::Result<()>;
    /// Register one more member on an adopted link.
    async fn bump_member_count(&self, id: Uuid) -> anyhow::Result<()>;
    /// Returns false when the link does not exist.
    async fn set_link_status(&self, id: Uuid, status: FamilyLinkStatus) -> anyhow::Result<bool>;

    // --- email change workflow ---
    async fn create_email_change(
        &self,
        user_id: Uuid,
        new_email: &str,
        code_hash: &str,
        now: DateTime<Utc>,
        cooldown: Duration,
    ) -> anyhow::Result<EmailChangeCreate>;
    async fn latest_unverified(&self, user_id: Uuid)
        -> anyhow::Result<Option<EmailChangeRequest>>;
    /// Mark `request_id` verified, update the profile email, and drop any
    /// other unverified requests for the user, all in one transaction.
    async fn finalize_email_change(
        &self,
        user_id: Uuid,
        request_id: Uuid,
        new_email: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()>;

    // --- push tokens / notifications ---
    async fn upsert_push_token(
        &self,
        user_id: Uuid,
        token: &str,
        platform: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()>;
    async fn list_notifications(&self, user_id: Uuid) -> anyhow::Result<Vec<Notification>>;

    // --- account deletion fan-out ---
    /// Delete every row owned by the user (appointments, logs, notifications,
    /// push tokens, family links, email change requests, profile) in one
    /// transaction. Returns false when no profile existed.
    async fn delete_account_data(&self, user_id: Uuid) -> anyhow::Result<bool>;
}
