use anyhow::{bail, Context};
use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

use crate::contract::model::UserProfile;
use crate::domain::ports::ProfileMirror;

/// HTTP adapter for the document store the mobile client reads directly.
pub struct HttpProfileMirror {
    http: reqwest::Client,
    base: Url,
    api_key: String,
}

impl HttpProfileMirror {
    pub fn new(http: reqwest::Client, base: Url, api_key: String) -> Self {
        Self {
            http,
            base,
            api_key,
        }
    }

    fn document_url(&self, user_id: Uuid) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("invalid mirror base URL"))?
            .extend(&["v1", "documents", "profiles", &user_id.to_string()]);
        Ok(url)
    }
}

#[async_trait]
impl ProfileMirror for HttpProfileMirror {
    #[instrument(name = "accounts.http.mirror.upsert_profile", skip_all, fields(user_id = %profile.id))]
    async fn upsert_profile(&self, profile: &UserProfile) -> anyhow::Result<()> {
        let url = self.document_url(profile.id)?;

        let body = serde_json::json!({
            "name": profile.name,
            "email": profile.email,
            "relationToDementiaPerson": profile.relation_to_patient,
            "familyId": profile.family_id,
            "avatarKey": profile.avatar_key,
            "avatarUrl": profile.avatar_url,
            "mainChallenges": profile.main_challenges,
            "helpNeeds": profile.help_needs,
            "updatedAt": profile.updated_at,
        });

        let response = self
            .http
            .patch(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("PATCH /v1/documents/profiles/{id}")?;

        if !response.status().is_success() {
            bail!("mirror upsert failed: HTTP {}", response.status());
        }
        Ok(())
    }

    #[instrument(name = "accounts.http.mirror.delete_profile", skip_all, fields(user_id = %user_id))]
    async fn delete_profile(&self, user_id: Uuid) -> anyhow::Result<()> {
        let url = self.document_url(user_id)?;

        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("DELETE /v1/documents/profiles/{id}")?;

        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
            bail!("mirror delete failed: HTTP {}", response.status());
        }
        Ok(())
    }
}

/// Mirror used when no document store is configured.
#[derive(Default)]
pub struct NoopProfileMirror;

#[async_trait]
impl ProfileMirror for NoopProfileMirror {
    async fn upsert_profile(&self, profile: &UserProfile) -> anyhow::Result<()> {
        debug!(user_id = %profile.id, "Mirror disabled; skipping profile upsert");
        Ok(())
    }

    async fn delete_profile(&self, user_id: Uuid) -> anyhow::Result<()> {
        debug!(%user_id, "Mirror disabled; skipping profile delete");
        Ok(())
    }
}
