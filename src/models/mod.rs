// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for Strety resources and persisted credentials.

pub mod credentials;
pub mod goal;
pub mod payload;
pub mod person;
pub mod resource;
pub mod todo;

pub use credentials::StoredTokens;
pub use goal::{Goal, GoalAttributes, GoalView};
pub use payload::{
    DeleteResult, GoalList, PeopleList, Resolved, TodoList, TodoMutation, UnknownAssignee,
};
pub use person::{Person, PersonAttributes, PersonView};
pub use resource::{Document, ListLinks, ListMeta, ListResponse, Resource};
pub use todo::{Todo, TodoAttributes, TodoDetail, TodoView};
