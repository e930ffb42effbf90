use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::contract::model::Guide;
use crate::domain::ports::ContentSource;

/// HTTP adapter for the headless CMS. Fetches the full visible result set for
/// a relation; the upstream does no tag filtering and the response is assumed
/// small enough to hold in memory.
pub struct HttpContentSource {
    http: reqwest::Client,
    base: Url,
    api_key: String,
}

impl HttpContentSource {
    pub fn new(http: reqwest::Client, base: Url, api_key: String) -> Self {
        Self {
            http,
            base,
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GuidesEnvelope {
    data: Vec<GuideDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuideDoc {
    id: serde_json::Value,
    title: String,
    slug: String,
    summary: Option<String>,
    relation: String,
    #[serde(default)]
    tags: Vec<TagDoc>,
    #[serde(default)]
    help_tags: Vec<TagDoc>,
}

#[derive(Debug, Deserialize)]
struct TagDoc {
    name: String,
}

impl From<GuideDoc> for Guide {
    fn from(doc: GuideDoc) -> Self {
        Self {
            // CMS ids are numeric or string depending on version; normalize.
            id: match doc.id {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            },
            title: doc.title,
            slug: doc.slug,
            summary: doc.summary,
            relation: doc.relation,
            tags: doc.tags.into_iter().map(|t| t.name).collect(),
            help_tags: doc.help_tags.into_iter().map(|t| t.name).collect(),
        }
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    #[instrument(name = "guides.http.cms.guides_for_relation", skip_all, fields(relation = %relation))]
    async fn guides_for_relation(&self, relation: &str) -> anyhow::Result<Vec<Guide>> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("invalid CMS base URL"))?
            .extend(&["api", "guides"]);
        url.query_pairs_mut()
            .append_pair("relation", relation)
            .append_pair("visible", "true");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("GET /api/guides")?;

        if !response.status().is_success() {
            bail!("guide fetch failed: HTTP {}", response.status());
        }

        let envelope: GuidesEnvelope = response.json().await.context("guides body")?;
        Ok(envelope.data.into_iter().map(Into::into).collect())
    }
}
