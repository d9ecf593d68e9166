// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared by the Strety client and the tool layer.

/// Every failure a Strety operation can report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No Strety access token available: set STRETY_ACCESS_TOKEN or provide a token file")]
    MissingCredential,

    #[error("Cannot refresh token: missing refresh token or client credentials")]
    RefreshUnavailable,

    #[error("Token refresh rejected: {0}")]
    RefreshRejected(String),

    #[error("Authentication failed. Please re-authenticate with Strety.")]
    AuthenticationFailed,

    #[error("Strety API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("No ETag returned for {0}; conditional write cannot proceed")]
    PreconditionMissing(String),

    #[error("Strety request failed: {0}")]
    Transport(String),

    #[error("Invalid Strety response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for every failure that means the caller must re-authenticate.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AppError::RefreshUnavailable
                | AppError::RefreshRejected(_)
                | AppError::AuthenticationFailed
        )
    }

    /// Upstream HTTP status, if this error came from a Strety response.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
