// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strety goal model.

use super::resource::{null_as_default, Resource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct GoalAttributes {
    #[serde(alias = "name", default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    /// Progress status (e.g. "on_track", "off_track")
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

pub type Goal = Resource<GoalAttributes>;

#[derive(Debug, Clone, Serialize)]
pub struct GoalView {
    pub id: String,
    pub title: String,
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub completed: bool,
    pub completed_at: Option<String>,
    pub assignee: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
