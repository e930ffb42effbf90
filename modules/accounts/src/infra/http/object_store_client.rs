use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::domain::ports::ObjectStore;

/// HTTP adapter for the managed object storage bucket.
pub struct HttpObjectStore {
    http: reqwest::Client,
    base: Url,
    api_key: String,
    bucket: String,
}

impl HttpObjectStore {
    pub fn new(http: reqwest::Client, base: Url, api_key: String, bucket: String) -> Self {
        Self {
            http,
            base,
            api_key,
            bucket,
        }
    }

    fn object_url(&self, prefix: &[&str], key: &str) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("invalid storage base URL"))?;
            segments.extend(prefix);
            segments.push(&self.bucket);
            // Keys contain slashes (avatars/{user}/{ts}.png); keep them as
            // path segments rather than percent-encoding the separator.
            segments.extend(key.split('/'));
        }
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignResponse {
    signed_url: String,
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    #[instrument(name = "accounts.http.storage.put_object", skip_all, fields(key = %key))]
    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> anyhow::Result<()> {
        let url = self.object_url(&["object"], key)?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .context("POST /object/{bucket}/{key}")?;

        if !response.status().is_success() {
            bail!("object upload failed: HTTP {}", response.status());
        }
        Ok(())
    }

    #[instrument(name = "accounts.http.storage.signed_url", skip_all, fields(key = %key))]
    async fn signed_url(&self, key: &str, ttl_secs: u64) -> anyhow::Result<String> {
        let url = self.object_url(&["object", "sign"], key)?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "expiresIn": ttl_secs }))
            .send()
            .await
            .context("POST /object/sign/{bucket}/{key}")?;

        if !response.status().is_success() {
            bail!("object signing failed: HTTP {}", response.status());
        }

        let sign: SignResponse = response.json().await.context("sign body")?;
        // The service answers with a bucket-relative path.
        let absolute = self
            .base
            .join(&sign.signed_url)
            .context("signed URL join")?;
        Ok(absolute.to_string())
    }
}
