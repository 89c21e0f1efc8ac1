//! Infrastructure implementation of the `IssueTracker` port over the Jira REST API v2.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::application::ports::{IssueLookup, IssueTracker};
use crate::domain::config::JiraConfig;
use crate::domain::tracker::VERSION_DESCRIPTION;
use crate::domain::{Story, TrackerError};

#[derive(Debug, Deserialize)]
struct IssueResponse {
    id: String,
    key: String,
    fields: IssueFields,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    #[serde(default)]
    summary: String,
    issuetype: IssueType,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default, rename = "fixVersions")]
    fix_versions: Vec<NamedVersion>,
}

#[derive(Debug, Deserialize)]
struct IssueType {
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct NamedVersion {
    name: String,
}

#[derive(Debug, Serialize)]
struct NewVersion<'a> {
    description: &'a str,
    name: &'a str,
    project: &'a str,
    released: bool,
}

/// Jira client for one project.
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: Client,
    config: JiraConfig,
}

impl JiraClient {
    /// Build a client. Every request is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: JiraConfig, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.url.trim_end_matches('/'))
    }

    fn story_from(&self, issue: IssueResponse) -> Story {
        Story {
            url: format!("{}/browse/{}", self.config.url.trim_end_matches('/'), issue.key),
            id: issue.id,
            key: issue.key,
            summary: issue.fields.summary,
            story_type: issue.fields.issuetype.name.to_lowercase(),
            labels: issue.fields.labels,
            fix_versions: issue.fields.fix_versions.into_iter().map(|v| v.name).collect(),
        }
    }
}

impl IssueTracker for JiraClient {
    async fn issue(&self, id: &str) -> Result<IssueLookup> {
        let url = self.url(&format!("/rest/api/2/issue/{id}"));
        tracing::debug!(%url, "fetching issue");
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.user, Some(&self.config.token))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| TrackerError::Unreachable {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| TrackerError::Unreachable {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        if status != StatusCode::OK {
            return Ok(IssueLookup::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        match serde_json::from_str::<IssueResponse>(&body) {
            Ok(issue) => Ok(IssueLookup::Found(self.story_from(issue))),
            Err(err) => Ok(IssueLookup::Rejected {
                status: status.as_u16(),
                body: format!("malformed issue: {err}"),
            }),
        }
    }

    async fn create_version(&self, name: &str) -> Result<()> {
        let url = self.url("/rest/api/2/version");
        let body = NewVersion {
            description: VERSION_DESCRIPTION,
            name,
            project: &self.config.project_key,
            released: false,
        };
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.user, Some(&self.config.token))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        let status = response.status();
        if status != StatusCode::CREATED {
            let text = response.text().await.unwrap_or_default();
            bail!("Unable to add version {name}: status {status}: {text}");
        }
        tracing::info!(%name, "created version");
        Ok(())
    }

    async fn set_fix_versions(&self, id: &str, versions: &[String]) -> Result<()> {
        let url = self.url(&format!("/rest/api/2/issue/{id}"));
        let set: Vec<_> = versions
            .iter()
            .map(|name| NamedVersion { name: name.clone() })
            .collect();
        let body = json!({ "update": { "fixVersions": [ { "set": set } ] } });
        let response = self
            .http
            .put(&url)
            .basic_auth(&self.config.user, Some(&self.config.token))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            let text = response.text().await.unwrap_or_default();
            bail!("Unable to tag issue {id}: status {status}: {text}");
        }
        Ok(())
    }
}
