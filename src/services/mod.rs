// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - Strety client layer and tool operations.

pub mod credentials;
pub mod goals;
pub mod pagination;
pub mod people;
pub mod presenters;
pub mod refresh;
pub mod strety;
pub mod todos;

pub use credentials::CredentialStore;
pub use people::{PeopleDirectory, PeopleIndex, Resolution};
pub use refresh::RefreshCoordinator;
pub use strety::{StretyClient, StretyService};
pub use todos::{CreateTodoArgs, ListArgs, UpdateTodoArgs};
