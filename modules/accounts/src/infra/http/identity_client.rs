use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use crate::domain::ports::{IdentityAccount, IdentityProvider, TokenClaims};

/// HTTP adapter for the managed identity service.
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    base: Url,
    api_key: String,
}

impl HttpIdentityProvider {
    pub fn new(http: reqwest::Client, base: Url, api_key: String) -> Self {
        Self {
            http,
            base,
            api_key,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("invalid identity base URL"))?
            .extend(segments);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct AccountDoc {
    uid: Uuid,
    email: String,
}

impl From<AccountDoc> for IdentityAccount {
    fn from(doc: AccountDoc) -> Self {
        Self {
            uid: doc.uid,
            email: doc.email,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenDoc {
    sub: Uuid,
}

#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    #[instrument(name = "accounts.http.identity.find_by_email", skip_all)]
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<IdentityAccount>> {
        let mut url = self.endpoint(&["v1", "accounts"])?;
        url.query_pairs_mut().append_pair("email", email);

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("GET /v1/accounts")?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            bail!("identity lookup failed: HTTP {}", response.status());
        }

        let doc: AccountDoc = response.json().await.context("account body")?;
        Ok(Some(doc.into()))
    }

    #[instrument(name = "accounts.http.identity.create_account", skip_all)]
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> anyhow::Result<IdentityAccount> {
        let url = self.endpoint(&["v1", "accounts"])?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "displayName": display_name,
            }))
            .send()
            .await
            .context("POST /v1/accounts")?;

        if !response.status().is_success() {
            bail!("identity create failed: HTTP {}", response.status());
        }

        let doc: AccountDoc = response.json().await.context("account body")?;
        Ok(doc.into())
    }

    #[instrument(name = "accounts.http.identity.verify_password", skip_all)]
    async fn verify_password(
        &self,
        email: &str,
        password: &str,
    ) -> anyhow::Result<Option<IdentityAccount>> {
        let url = self.endpoint(&["v1", "accounts:verifyPassword"])?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&CredentialsBody { email, password })
            .send()
            .await
            .context("POST /v1/accounts:verifyPassword")?;

        // Unknown account and bad password both come back as auth failures;
        // the caller must not be able to tell them apart.
        match response.status() {
            s if s.is_success() => {
                let doc: AccountDoc = response.json().await.context("account body")?;
                Ok(Some(doc.into()))
            }
            reqwest::StatusCode::UNAUTHORIZED
            | reqwest::StatusCode::FORBIDDEN
            | reqwest::StatusCode::NOT_FOUND => Ok(None),
            s => bail!("password verification failed: HTTP {}", s),
        }
    }

    #[instrument(name = "accounts.http.identity.update_password", skip_all, fields(uid = %uid))]
    async fn update_password(&self, uid: Uuid, new_password: &str) -> anyhow::Result<()> {
        let url = self.endpoint(&["v1", "accounts", &uid.to_string()])?;

        let response = self
            .http
            .patch(url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "password": new_password }))
            .send()
            .await
            .context("PATCH /v1/accounts/{uid}")?;

        if !response.status().is_success() {
            bail!("password update failed: HTTP {}", response.status());
        }
        Ok(())
    }

    #[instrument(name = "accounts.http.identity.update_email", skip_all, fields(uid = %uid))]
    async fn update_email(&self, uid: Uuid, new_email: &str) -> anyhow::Result<()> {
        let url = self.endpoint(&["v1", "accounts", &uid.to_string()])?;

        let response = self
            .http
            .patch(url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "email": new_email }))
            .send()
            .await
            .context("PATCH /v1/accounts/{uid}")?;

        if !response.status().is_success() {
            bail!("email update failed: HTTP {}", response.status());
        }
        Ok(())
    }

    #[instrument(name = "accounts.http.identity.verify_token", skip_all)]
    async fn verify_token(&self, token: &str) -> anyhow::Result<Option<TokenClaims>> {
        let url = self.endpoint(&["v1", "tokens:verify"])?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await
            .context("POST /v1/tokens:verify")?;

        match response.status() {
            s if s.is_success() => {
                let doc: TokenDoc = response.json().await.context("token body")?;
                Ok(Some(TokenClaims { subject: doc.sub }))
            }
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::BAD_REQUEST => Ok(None),
            s => bail!("token verification failed: HTTP {}", s),
        }
    }

    #[instrument(name = "accounts.http.identity.delete_account", skip_all, fields(uid = %uid))]
    async fn delete_account(&self, uid: Uuid) -> anyhow::Result<()> {
        let url = self.endpoint(&["v1", "accounts", &uid.to_string()])?;

        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("DELETE /v1/accounts/{uid}")?;

        // A credential that is already gone is fine.
        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
            bail!("identity delete failed: HTTP {}", response.status());
        }
        Ok(())
    }
}
