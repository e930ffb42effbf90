use anyhow::{bail, Context};
use async_trait::async_trait;
use tracing::instrument;
use url::Url;

use crate::domain::ports::Mailer;

/// HTTP adapter for the transactional email API.
pub struct HttpMailer {
    http: reqwest::Client,
    base: Url,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(http: reqwest::Client, base: Url, api_key: String, from: String) -> Self {
        Self {
            http,
            base,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    #[instrument(name = "accounts.http.mailer.send_confirmation_code", skip_all)]
    async fn send_confirmation_code(&self, to: &str, code: &str) -> anyhow::Result<()> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("invalid email base URL"))?
            .extend(&["emails"]);

        let body = serde_json::json!({
            "from": self.from,
            "to": [to],
            "subject": "Confirm your new email address",
            "text": format!(
                "Your Memora confirmation code is {code}. It expires in 10 minutes.\n\n\
                 If you did not request an email change, you can ignore this message."
            ),
        });

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("POST /emails")?;

        if !response.status().is_success() {
            bail!("email send failed: HTTP {}", response.status());
        }
        Ok(())
    }
}
