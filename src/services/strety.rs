// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strety API client.
//!
//! Handles:
//! - Bearer authentication from the credential store
//! - One refresh-and-retry cycle when Strety answers 401
//! - Content negotiation (JSON reads, JSON:API writes)
//! - ETag lookup for conditional (`If-Match`) updates

use crate::error::AppError;
use crate::services::credentials::CredentialStore;
use crate::services::refresh::RefreshCoordinator;
use reqwest::header::{HeaderName, ACCEPT, CONTENT_TYPE, ETAG, IF_MATCH};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Content type for reads.
pub const READ_CONTENT_TYPE: &str = "application/json";

/// Content type for writes (JSON:API), also sent as `Accept` on every request.
pub const WRITE_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Where a logical request is in its authentication lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthAttempt {
    /// First send with the current access token.
    Initial,
    /// Resent once after a successful refresh; another 401 is final.
    Retried,
}

/// Strety API client. Every network call except the refresh exchange goes
/// through `send_authorized`.
#[derive(Clone)]
pub struct StretyClient {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialStore,
    refresher: RefreshCoordinator,
}

impl StretyClient {
    pub fn new(
        http: reqwest::Client,
        base_url: String,
        credentials: CredentialStore,
        refresher: RefreshCoordinator,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            refresher,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Issue one logical request and parse the JSON response.
    ///
    /// An empty success body yields `{"success": true}`.
    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        extra_headers: &[(HeaderName, String)],
    ) -> Result<Value, AppError> {
        let response = self
            .send_authorized(method, endpoint, body, extra_headers)
            .await?;
        let response = check_response(endpoint, response).await?;

        let text = response
            .text()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        if text.trim().is_empty() {
            return Ok(serde_json::json!({ "success": true }));
        }

        serde_json::from_str(&text)
            .map_err(|e| AppError::InvalidResponse(format!("JSON parse error: {}", e)))
    }

    /// GET an endpoint and deserialize the body.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, AppError> {
        let value = self.execute(Method::GET, endpoint, None, &[]).await?;
        serde_json::from_value(value).map_err(|e| {
            AppError::InvalidResponse(format!("Unexpected response from {}: {}", endpoint, e))
        })
    }

    /// Fetch the current ETag of a single resource.
    ///
    /// Never cached: a stale tag would make the conditional write fail.
    pub async fn fetch_version_tag(&self, endpoint: &str) -> Result<String, AppError> {
        let response = self
            .send_authorized(Method::GET, endpoint, None, &[])
            .await?;
        let response = check_response(endpoint, response).await?;

        response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::PreconditionMissing(endpoint.to_string()))
    }

    /// PATCH a single resource guarded by a freshly fetched ETag.
    ///
    /// A precondition failure (412) is returned as-is; the caller decides
    /// whether to re-read and try again.
    pub async fn conditional_update(&self, endpoint: &str, body: &Value) -> Result<Value, AppError> {
        let tag = self.fetch_version_tag(endpoint).await?;
        self.execute(Method::PATCH, endpoint, Some(body), &[(IF_MATCH, tag)])
            .await
    }

    /// DELETE a single resource guarded by a freshly fetched ETag.
    pub async fn conditional_delete(&self, endpoint: &str) -> Result<Value, AppError> {
        let tag = self.fetch_version_tag(endpoint).await?;
        self.execute(Method::DELETE, endpoint, None, &[(IF_MATCH, tag)])
            .await
    }

    /// Send with bearer auth, refreshing and resending at most once on 401.
    async fn send_authorized(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        extra_headers: &[(HeaderName, String)],
    ) -> Result<reqwest::Response, AppError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let payload = match body {
            Some(body) if is_write(&method) => Some(serde_json::to_vec(body).map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to encode request body: {}", e))
            })?),
            _ => None,
        };

        let mut attempt = AuthAttempt::Initial;
        loop {
            let access_token = self.credentials.current();

            let mut request = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(&access_token)
                .header(ACCEPT, WRITE_CONTENT_TYPE)
                .header(CONTENT_TYPE, content_type_for(&method));
            for (name, value) in extra_headers {
                request = request.header(name.clone(), value.as_str());
            }
            if let Some(payload) = &payload {
                request = request.body(payload.clone());
            }

            let response = request.send().await.map_err(|e| {
                tracing::warn!(method = %method, endpoint, error = %e, "Strety request failed");
                AppError::Transport(e.to_string())
            })?;

            if response.status() != StatusCode::UNAUTHORIZED {
                return Ok(response);
            }

            match attempt {
                AuthAttempt::Initial => {
                    tracing::warn!(method = %method, endpoint, "Token expired, attempting refresh");
                    self.refresher.refresh(&access_token).await?;
                    attempt = AuthAttempt::Retried;
                }
                AuthAttempt::Retried => {
                    tracing::error!(
                        method = %method,
                        endpoint,
                        "Request rejected again after token refresh"
                    );
                    return Err(AppError::AuthenticationFailed);
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StretyService - High-level service shared by all tool operations
// ─────────────────────────────────────────────────────────────────────────────

use crate::config::Config;
use crate::services::people::PeopleDirectory;

/// Process-wide client context.
///
/// Owns the only credential store and people cache; operations live in
/// `services::todos` and `services::goals`.
#[derive(Clone)]
pub struct StretyService {
    client: StretyClient,
    people: PeopleDirectory,
}

impl StretyService {
    /// Build the service from configuration and already-loaded credentials.
    pub fn new(config: &Config, credentials: CredentialStore) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        let refresher = RefreshCoordinator::new(
            http.clone(),
            config.token_endpoint(),
            config.client_id.clone(),
            config.client_secret.clone(),
            credentials.clone(),
        );
        let client = StretyClient::new(http, config.api_base.clone(), credentials, refresher);

        Ok(Self::from_client(client))
    }

    pub fn from_client(client: StretyClient) -> Self {
        Self {
            people: PeopleDirectory::new(client.clone()),
            client,
        }
    }

    pub fn client(&self) -> &StretyClient {
        &self.client
    }

    pub fn people(&self) -> &PeopleDirectory {
        &self.people
    }
}

fn is_write(method: &Method) -> bool {
    [Method::POST, Method::PATCH, Method::PUT, Method::DELETE].contains(method)
}

fn content_type_for(method: &Method) -> &'static str {
    if is_write(method) {
        WRITE_CONTENT_TYPE
    } else {
        READ_CONTENT_TYPE
    }
}

/// Check response status and return an `Upstream` error if not successful.
async fn check_response(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, AppError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(endpoint, status = status.as_u16(), "Strety API error");

    Err(AppError::Upstream {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_depends_on_method() {
        assert_eq!(content_type_for(&Method::GET), READ_CONTENT_TYPE);
        assert_eq!(content_type_for(&Method::POST), WRITE_CONTENT_TYPE);
        assert_eq!(content_type_for(&Method::PATCH), WRITE_CONTENT_TYPE);
        assert_eq!(content_type_for(&Method::DELETE), WRITE_CONTENT_TYPE);
    }
}
