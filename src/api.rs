//! HTTP client for the remote conference API.
//! Every response body is returned as untyped JSON; the normalize module makes sense of it.

use reqwest::{Response, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::normalize::extract_error_message;

#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base = Url::parse(&config.api_base_url()).map_err(|e| {
            ClientError::invalid_input(format!("invalid API base URL '{}': {}", config.api_url, e))
        })?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { base, client })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base
            .join(path)
            .map_err(|e| ClientError::invalid_input(format!("bad endpoint path '{}': {}", path, e)))
    }

    /// Non-2xx bodies become `Remote` errors carrying the server's own message when it sent one.
    async fn into_json(resp: Response) -> ClientResult<Value> {
        let status = resp.status();
        let url = resp.url().to_string();
        let text = resp.text().await?;
        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        if !status.is_success() {
            let message = extract_error_message(&body).unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            debug!(target: "api", %url, status = status.as_u16(), %message, "request rejected");
            return Err(ClientError::Remote { status: status.as_u16(), message });
        }
        Ok(body)
    }

    async fn get_authorized(&self, path: &str, token: &str) -> ClientResult<Value> {
        let url = self.endpoint(path)?;
        debug!(target: "api", %url, "GET");
        let resp = self.client.get(url).bearer_auth(token).send().await?;
        Self::into_json(resp).await
    }

    /// `POST auth/login`. The raw body is returned whatever its shape.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Value> {
        let url = self.endpoint("auth/login")?;
        debug!(target: "api", %url, "POST login");
        let resp = self
            .client
            .post(url)
            .json(&serde_json::json!({"email": email, "password": password}))
            .send()
            .await
            .map_err(|e| {
                warn!(target: "api", error = %e, "login request did not complete");
                ClientError::from(e)
            })?;
        Self::into_json(resp).await
    }

    pub async fn my_proposals(&self, token: &str) -> ClientResult<Value> {
        self.get_authorized("cfp/my-proposals", token).await
    }

    /// Fails with a `Remote` error for proposals that have not been evaluated yet.
    pub async fn evaluation(&self, token: &str, proposal_id: &str) -> ClientResult<Value> {
        if proposal_id.is_empty() {
            return Err(ClientError::invalid_input("proposal without id"));
        }
        let mut url = self.endpoint("evaluations/proposal/")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::invalid_input("API base URL cannot hold a path"))?
            .pop_if_empty()
            .push(proposal_id);
        debug!(target: "api", %url, "GET");
        let resp = self.client.get(url).bearer_auth(token).send().await?;
        Self::into_json(resp).await
    }

    pub async fn me(&self, token: &str) -> ClientResult<Value> {
        self.get_authorized("auth/me", token).await
    }
}
