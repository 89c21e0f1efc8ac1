//! Infrastructure implementation of the `ChangeManagement` port over the
//! ServiceNow Table API.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::ChangeManagement;
use crate::domain::ChangeRequest;
use crate::domain::config::ServiceNowConfig;

#[derive(Debug, Deserialize)]
struct CreateResponse {
    result: CreatedRecord,
}

#[derive(Debug, Deserialize)]
struct CreatedRecord {
    number: String,
}

#[derive(Debug, Clone)]
pub struct ServiceNowClient {
    http: Client,
    config: ServiceNowConfig,
}

impl ServiceNowClient {
    /// Build a client. Every request is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ServiceNowConfig, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, config })
    }
}

impl ChangeManagement for ServiceNowClient {
    async fn create_change(&self, request: &ChangeRequest) -> Result<String> {
        let url = format!(
            "{}/api/now/table/change_request",
            self.config.url.trim_end_matches('/')
        );
        tracing::debug!(%url, "creating change request");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("reading response from {url}"))?;
        if !status.is_success() {
            bail!("ServiceNow returned status {status}: {body}");
        }
        let created: CreateResponse = serde_json::from_str(&body)
            .with_context(|| format!("unexpected response from {url}"))?;
        Ok(created.result.number)
    }
}
