// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Result payloads returned by tool operations.

use super::{GoalView, PersonView, TodoDetail, TodoView};
use serde::Serialize;

/// An operation result that depends on resolving an assignee name.
///
/// An unknown name is an ordinary outcome, not an error: the caller gets
/// the list of known names to choose from.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Resolved<T> {
    Done(T),
    UnknownAssignee(UnknownAssignee),
}

impl<T> Resolved<T> {
    pub fn done(self) -> Option<T> {
        match self {
            Resolved::Done(value) => Some(value),
            Resolved::UnknownAssignee(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownAssignee {
    pub error: String,
    pub people: Vec<String>,
}

impl UnknownAssignee {
    pub fn new(query: &str, candidates: Vec<String>) -> Self {
        Self {
            error: format!("No person found matching \"{}\"", query),
            people: candidates,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TodoList {
    pub todos: Vec<TodoView>,
    pub count: usize,
    pub assignee_filter: Option<String>,
    pub show_completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalList {
    pub goals: Vec<GoalView>,
    pub count: usize,
    pub assignee_filter: Option<String>,
    pub show_completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeopleList {
    pub people: Vec<PersonView>,
    pub count: usize,
}

/// Result of a create/update/complete call.
///
/// `todo` is absent when Strety answered with an empty body.
#[derive(Debug, Clone, Serialize)]
pub struct TodoMutation {
    pub success: bool,
    pub todo: Option<TodoDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteResult {
    pub success: bool,
    pub deleted: String,
}
