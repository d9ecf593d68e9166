// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! On-disk token file format.

use serde::{Deserialize, Serialize};

/// Persisted OAuth tokens (`token.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    /// Current access token
    #[serde(default)]
    pub access_token: String,
    /// Refresh token, if the server issued one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// When these tokens were written (RFC 3339)
    #[serde(default)]
    pub saved_at: String,
}
