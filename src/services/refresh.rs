// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth refresh-token exchange.
//!
//! Refreshes are serialized: a caller that waited on the lock while another
//! caller refreshed sees a new access token in the store and returns without
//! a second exchange (a rotated refresh token would reject it anyway).

use crate::error::AppError;
use crate::services::credentials::CredentialStore;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Token refresh response from Strety.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Exchanges the refresh token for a new access token.
#[derive(Clone)]
pub struct RefreshCoordinator {
    http: reqwest::Client,
    token_endpoint: String,
    client_id: Option<String>,
    client_secret: Option<String>,
    store: CredentialStore,
    lock: Arc<Mutex<()>>,
}

impl RefreshCoordinator {
    pub fn new(
        http: reqwest::Client,
        token_endpoint: String,
        client_id: Option<String>,
        client_secret: Option<String>,
        store: CredentialStore,
    ) -> Self {
        Self {
            http,
            token_endpoint,
            client_id,
            client_secret,
            store,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Refresh the access token that was rejected as `stale_access`.
    ///
    /// Returns `RefreshUnavailable` without a network call when the refresh
    /// token or client credentials are missing, and `RefreshRejected` when
    /// the exchange fails for any reason.
    pub async fn refresh(&self, stale_access: &str) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;

        // Another task may have refreshed while we were waiting.
        if self.store.current() != stale_access {
            tracing::debug!("Token already refreshed by a concurrent request");
            return Ok(());
        }

        let (Some(refresh_token), Some(client_id), Some(client_secret)) = (
            self.store.refresh_token(),
            self.client_id.as_deref(),
            self.client_secret.as_deref(),
        ) else {
            tracing::error!("Cannot refresh token: missing refresh_token or client credentials");
            return Err(AppError::RefreshUnavailable);
        };

        tracing::info!("Access token rejected, refreshing");

        let response = self
            .http
            .post(&self.token_endpoint)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Token refresh request failed");
                AppError::RefreshRejected(format!("Token refresh request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Token refresh failed");
            return Err(AppError::RefreshRejected(format!("HTTP {}: {}", status, body)));
        }

        let tokens: TokenRefreshResponse = response.json().await.map_err(|e| {
            AppError::RefreshRejected(format!("Failed to parse token response: {}", e))
        })?;

        self.store
            .save(&tokens.access_token, tokens.refresh_token.as_deref())
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to persist refreshed tokens");
                e
            })?;

        tracing::info!(
            rotated = tokens.refresh_token.is_some(),
            "Token refreshed successfully"
        );
        Ok(())
    }
}
