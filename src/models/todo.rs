// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strety todo model.

use super::resource::{null_as_default, Resource};
use serde::{Deserialize, Serialize};

/// Todo attributes as returned by Strety.
///
/// A todo is open while `completed_at` is null.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoAttributes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_html: Option<String>,
    /// Due date (ISO 8601 date, lexically sortable)
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

pub type Todo = Resource<TodoAttributes>;

/// Todo row in list results.
#[derive(Debug, Clone, Serialize)]
pub struct TodoView {
    pub id: String,
    pub title: String,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub completed: bool,
    pub completed_at: Option<String>,
    pub assignee: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Full todo details.
#[derive(Debug, Clone, Serialize)]
pub struct TodoDetail {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub description_html: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub completed: bool,
    pub completed_at: Option<String>,
    pub assignee: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
