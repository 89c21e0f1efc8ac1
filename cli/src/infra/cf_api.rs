//! Infrastructure implementation of the `PlatformApi` port over the Cloud
//! Foundry v2 REST API.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::application::ports::{PlatformApi, Space};
use crate::domain::app::AppState;
use crate::domain::{AppInstance, AppRoute, DeploymentTarget, PlatformError};

/// OAuth client id the `cf` CLI itself uses. Its secret is empty.
const OAUTH_CLIENT: &str = "cf";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Page<E> {
    next_url: Option<String>,
    #[serde(default = "Vec::new")]
    resources: Vec<Resource<E>>,
}

#[derive(Debug, Deserialize)]
struct Resource<E> {
    metadata: Metadata,
    entity: E,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    guid: String,
}

#[derive(Debug, Deserialize)]
struct SpaceEntity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AppEntity {
    name: String,
    state: String,
}

#[derive(Debug, Deserialize)]
struct RouteEntity {
    host: Option<String>,
    path: Option<String>,
}

/// REST client bound to one deployment target.
#[derive(Debug, Clone)]
pub struct CfApiClient {
    http: Client,
    api_endpoint: String,
    login_endpoint: String,
}

impl CfApiClient {
    /// Build a client for `target`. Every request is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(target: &DeploymentTarget, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(target.skip_ssl_validation)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            api_endpoint: target.api_endpoint.trim_end_matches('/').to_string(),
            login_endpoint: target.login_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Follow `next_url` from `path` until the listing is exhausted.
    async fn get_all<E: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
    ) -> Result<Vec<Resource<E>>> {
        let mut resources = Vec::new();
        let mut next = Some(path.to_string());
        while let Some(path) = next {
            let url = if path.starts_with("http") {
                path
            } else {
                format!("{}{path}", self.api_endpoint)
            };
            tracing::debug!(%url, "GET");
            let response = self
                .http
                .get(&url)
                .bearer_auth(token)
                .send()
                .await
                .map_err(|e| request_error(&url, &e))?;
            let page: Page<E> = decode(&url, response).await?;
            resources.extend(page.resources);
            next = page.next_url.filter(|n| !n.is_empty() && n != "null");
        }
        Ok(resources)
    }
}

fn request_error(url: &str, err: &reqwest::Error) -> PlatformError {
    if err.is_timeout() {
        PlatformError::RequestTimeout {
            url: url.to_string(),
        }
    } else {
        PlatformError::Request {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Check the status and decode the JSON body.
async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(PlatformError::Request {
            url: url.to_string(),
            reason: format!("status {status}"),
        }
        .into());
    }
    let body = response.text().await.map_err(|e| request_error(url, &e))?;
    serde_json::from_str(&body).map_err(|e| {
        PlatformError::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl PlatformApi for CfApiClient {
    async fn authenticate(&self, user: &str, password: &str) -> Result<String> {
        let url = format!("{}/oauth/token", self.login_endpoint);
        tracing::debug!(%url, %user, "requesting token");
        let response = self
            .http
            .post(&url)
            .basic_auth(OAUTH_CLIENT, Some(""))
            .form(&[
                ("grant_type", "password"),
                ("username", user),
                ("password", password),
            ])
            .send()
            .await
            .map_err(|e| request_error(&url, &e))?;
        let token: TokenResponse = decode(&url, response).await?;
        token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PlatformError::MissingToken.into())
    }

    async fn list_spaces(&self, token: &str) -> Result<Vec<Space>> {
        let resources: Vec<Resource<SpaceEntity>> = self.get_all(token, "/v2/spaces").await?;
        Ok(resources
            .into_iter()
            .map(|r| Space {
                guid: r.metadata.guid,
                name: r.entity.name,
            })
            .collect())
    }

    async fn list_apps(&self, token: &str, space_guid: &str) -> Result<Vec<AppInstance>> {
        let path = format!("/v2/spaces/{space_guid}/apps");
        let resources: Vec<Resource<AppEntity>> = self.get_all(token, &path).await?;
        Ok(resources
            .into_iter()
            .filter_map(|r| {
                let Some(state) = AppState::parse(&r.entity.state) else {
                    tracing::debug!(app = %r.entity.name, state = %r.entity.state, "ignoring app in unknown state");
                    return None;
                };
                Some(AppInstance {
                    name: r.entity.name,
                    guid: r.metadata.guid,
                    state,
                })
            })
            .collect())
    }

    async fn list_app_routes(&self, token: &str, app_guid: &str) -> Result<Vec<AppRoute>> {
        let path = format!("/v2/apps/{app_guid}/routes");
        let resources: Vec<Resource<RouteEntity>> = self.get_all(token, &path).await?;
        Ok(resources
            .into_iter()
            .map(|r| AppRoute {
                guid: r.metadata.guid,
                host: non_empty(r.entity.host),
                path: non_empty(r.entity.path),
            })
            .collect())
    }
}
