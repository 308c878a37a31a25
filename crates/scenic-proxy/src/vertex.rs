//! HTTP client for the remote files/scenes API
//!
//! Authenticates with OAuth2 client credentials and caches the access
//! token until shortly before it expires.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use scenic_core::query::{first_value, query_pairs};
use scenic_core::{
    Failure, FailureResponse, Page, PageRequest, RemoteError, ResourceData, ResourceKind,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::VertexConfig;
use crate::remote::ResourceApi;

const JSON_API: &str = "application/vnd.api+json";

/// Refresh tokens this long before the server-side expiry
const TOKEN_SLACK_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: DateTime<Utc>,
}

impl CachedToken {
    fn new(value: String, expires_in: i64, now: DateTime<Utc>) -> Self {
        let lifetime = (expires_in - TOKEN_SLACK_SECS).max(0);
        Self {
            value,
            refresh_at: now + Duration::seconds(lifetime),
        }
    }

    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.refresh_at
    }
}

#[derive(Debug, Deserialize)]
struct ListBody {
    #[serde(default)]
    data: Vec<ResourceData>,
    #[serde(default)]
    links: Option<Links>,
}

#[derive(Debug, Deserialize)]
struct Links {
    #[serde(default)]
    next: Option<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
}

#[derive(Debug, Deserialize)]
struct DataBody {
    data: ResourceData,
}

/// Remote resource API over HTTPS
pub struct HttpResourceApi {
    client: reqwest::Client,
    base_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
    token: Mutex<Option<CachedToken>>,
}

impl HttpResourceApi {
    pub fn new(config: &VertexConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        if config.client_id.is_none() || config.client_secret.is_none() {
            warn!("Remote API client credentials not configured, requests will fail");
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token: Mutex::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Current access token, fetching a new one when the cached one is stale
    async fn access_token(&self) -> Result<String, RemoteError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.value.clone());
        }

        let (Some(id), Some(secret)) = (&self.client_id, &self.client_secret) else {
            return Err(RemoteError::Unknown(
                "Remote API client credentials not configured".to_string(),
            ));
        };

        debug!(client_id = %id, "Requesting access token");
        let response = self
            .client
            .post(self.url("oauth2/token"))
            .basic_auth(id, Some(secret))
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response).await?;
        let body: TokenBody = response.json().await.map_err(transport_error)?;

        let token = CachedToken::new(body.access_token, body.expires_in, Utc::now());
        info!(refresh_at = %token.refresh_at, "Obtained access token");
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }
}

#[async_trait]
impl ResourceApi for HttpResourceApi {
    async fn list(
        &self,
        kind: ResourceKind,
        request: &PageRequest,
    ) -> Result<Page<ResourceData>, RemoteError> {
        let token = self.access_token().await?;

        let mut query = vec![("page[size]", request.page_size.to_string())];
        if let Some(cursor) = &request.cursor {
            query.push(("page[cursor]", cursor.clone()));
        }
        if kind == ResourceKind::Files {
            if let Some(supplied_id) = &request.supplied_id {
                query.push(("filter[suppliedId]", supplied_id.clone()));
            }
        }

        let response = self
            .client
            .get(self.url(kind.path()))
            .bearer_auth(token)
            .header(ACCEPT, JSON_API)
            .query(&query)
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response).await?;
        let body: ListBody = response.json().await.map_err(transport_error)?;
        let cursor = body
            .links
            .and_then(|links| links.next)
            .and_then(|next| next_cursor(&next.href));

        debug!(
            resource = %kind,
            count = body.data.len(),
            has_next = cursor.is_some(),
            "Listed resources"
        );
        Ok(Page {
            cursor,
            data: body.data,
        })
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), RemoteError> {
        let token = self.access_token().await?;
        let path = format!("{}/{}", kind.path(), urlencoding::encode(id));

        let response = self
            .client
            .delete(self.url(&path))
            .bearer_auth(token)
            .header(ACCEPT, JSON_API)
            .send()
            .await
            .map_err(transport_error)?;

        check_status(response).await?;
        debug!(resource = %kind, id = %id, "Deleted resource");
        Ok(())
    }

    async fn create_file(
        &self,
        attributes: Map<String, Value>,
    ) -> Result<ResourceData, RemoteError> {
        let token = self.access_token().await?;
        let body = json!({
            "data": {
                "type": ResourceKind::Files.resource_type(),
                "attributes": attributes,
            }
        });

        let response = self
            .client
            .post(self.url(ResourceKind::Files.path()))
            .bearer_auth(token)
            .header(ACCEPT, JSON_API)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response).await?;
        let created: DataBody = response.json().await.map_err(transport_error)?;
        info!(id = %created.data.id, "Created file");
        Ok(created.data)
    }
}

fn transport_error(e: reqwest::Error) -> RemoteError {
    RemoteError::Unknown(e.to_string())
}

/// Pass 2xx responses through; turn anything else into a `RemoteError`
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!(status = %status, "Remote API request failed");
    Err(failure_from_body(status, &body))
}

/// Parse an error body. `{errors: [...]}` is structured, everything else unknown.
fn failure_from_body(status: StatusCode, body: &str) -> RemoteError {
    match serde_json::from_str::<Failure>(body) {
        Ok(failure) if failure.first().is_some() => {
            RemoteError::Structured(FailureResponse::new(failure))
        }
        _ => RemoteError::Unknown(format!("HTTP {}: {}", status.as_u16(), body.trim())),
    }
}

/// `page[cursor]` from a `links.next.href`
fn next_cursor(href: &str) -> Option<String> {
    let (_, query) = href.split_once('?')?;
    let pairs = query_pairs(query);
    first_value(&pairs, "page[cursor]")
        .filter(|cursor| !cursor.is_empty())
        .map(str::to_string)
}
