// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential store: the single live access/refresh token pair.
//!
//! Loading priority:
//! 1. Token file (written by an earlier refresh, possibly in another process)
//! 2. Seed values from the environment
//!
//! Every mutation is persisted with write-then-rename so readers never see a
//! half-written file.

use crate::error::AppError;
use crate::models::StoredTokens;
use crate::time_utils::now_rfc3339;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-wide credential holder shared by the request layer.
#[derive(Clone)]
pub struct CredentialStore {
    path: PathBuf,
    tokens: Arc<RwLock<StoredTokens>>,
}

impl CredentialStore {
    /// Load credentials from the token file, falling back to seed values.
    ///
    /// Fails with `MissingCredential` if neither source has an access token.
    pub fn load(
        path: impl Into<PathBuf>,
        seed_access: Option<String>,
        seed_refresh: Option<String>,
    ) -> Result<Self, AppError> {
        let path = path.into();
        let seed_refresh = seed_refresh.filter(|t| !t.is_empty());

        let from_file = match read_token_file(&path) {
            Ok(Some(stored)) if !stored.access_token.is_empty() => {
                tracing::info!(
                    path = %path.display(),
                    saved_at = %stored.saved_at,
                    "Loaded tokens from token file"
                );
                Some(stored)
            }
            Ok(_) => {
                tracing::debug!(path = %path.display(), "No usable token file, using seed values");
                None
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load token file, using seed values"
                );
                None
            }
        };

        let tokens = match from_file {
            Some(stored) => StoredTokens {
                refresh_token: stored.refresh_token.or(seed_refresh),
                ..stored
            },
            None => StoredTokens {
                access_token: seed_access
                    .filter(|t| !t.is_empty())
                    .ok_or(AppError::MissingCredential)?,
                refresh_token: seed_refresh,
                // Seed values have never been written.
                saved_at: String::new(),
            },
        };

        Ok(Self {
            path,
            tokens: Arc::new(RwLock::new(tokens)),
        })
    }

    /// Create an in-memory store persisting to `path`, ignoring any file there.
    pub fn with_tokens(path: impl Into<PathBuf>, access: &str, refresh: Option<&str>) -> Self {
        Self {
            path: path.into(),
            tokens: Arc::new(RwLock::new(StoredTokens {
                access_token: access.to_string(),
                refresh_token: refresh.map(str::to_string),
                saved_at: String::new(),
            })),
        }
    }

    /// The active access token.
    pub fn current(&self) -> String {
        self.read().access_token.clone()
    }

    /// The active refresh token, if any.
    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    /// Copy of the live token pair and when it was last saved.
    pub fn snapshot(&self) -> StoredTokens {
        self.read().clone()
    }

    /// Persist a new access token (and rotated refresh token, if given).
    ///
    /// When `refresh` is `None` the current refresh token is kept. The file
    /// is written before the in-memory pair is swapped, without holding the
    /// lock, so readers are never blocked on disk I/O. Callers serialize
    /// saves (the refresh coordinator holds its own lock).
    pub fn save(&self, access: &str, refresh: Option<&str>) -> Result<(), AppError> {
        let stored = StoredTokens {
            access_token: access.to_string(),
            refresh_token: refresh.map(str::to_string).or_else(|| self.refresh_token()),
            saved_at: now_rfc3339(),
        };
        write_token_file(&self.path, &stored)?;

        *self.write() = stored;
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, StoredTokens> {
        // Tokens are always replaced as a whole, so a poisoned lock still holds a valid pair.
        self.tokens.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoredTokens> {
        self.tokens.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Read the token file. `Ok(None)` if it does not exist.
pub fn read_token_file(path: &Path) -> Result<Option<StoredTokens>, AppError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Malformed token file: {}", e)))
}

/// Write the token file atomically (temp file + rename).
fn write_token_file(path: &Path, tokens: &StoredTokens) -> Result<(), AppError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let json = serde_json::to_string_pretty(tokens)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode tokens: {}", e)))?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    write_private(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
}
