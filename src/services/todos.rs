// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Todo operations.

use crate::error::AppError;
use crate::models::{
    DeleteResult, Document, PeopleList, Resolved, Todo, TodoDetail, TodoList, TodoMutation,
    UnknownAssignee,
};
use crate::services::pagination::{self, clamp_limit, sort_by_due_date};
use crate::services::people::{self, Resolution};
use crate::services::presenters::{present_person, present_todo, present_todo_detail};
use crate::services::strety::StretyService;
use crate::time_utils::now_rfc3339;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use validator::Validate;

/// Filters shared by the todo and goal listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListArgs {
    /// Partial assignee name (case-insensitive)
    pub assignee: Option<String>,
    /// Include completed items (default false)
    pub show_completed: Option<bool>,
    /// Result cap (default 50, max 100)
    pub max_results: Option<u32>,
}

impl ListArgs {
    pub(crate) fn assignee_query(&self) -> Option<&str> {
        self.assignee.as_deref().map(str::trim).filter(|a| !a.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoArgs {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    /// Partial assignee name
    pub assignee: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoArgs {
    #[validate(length(min = 1, message = "todoId is required"))]
    pub todo_id: String,
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    /// Partial assignee name, re-resolved against the people directory
    pub assignee: Option<String>,
}

impl UpdateTodoArgs {
    fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.due_date.is_some()
            || self.priority.is_some()
            || self
                .assignee
                .as_deref()
                .is_some_and(|a| !a.trim().is_empty())
    }
}

/// Path of a single todo, with the ID percent-encoded.
pub(crate) fn resource_endpoint(collection: &str, id: &str) -> Result<String, AppError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::BadRequest("resource ID is required".to_string()));
    }
    Ok(format!("/{}/{}", collection, urlencoding::encode(id)))
}

/// Collection path filtered server-side by assignee.
pub(crate) fn assignee_endpoint(collection: &str, assignee_id: &str) -> String {
    format!(
        "/{}?filter%5Bassignee_id%5D={}",
        collection,
        urlencoding::encode(assignee_id)
    )
}

fn validate(args: &impl Validate) -> Result<(), AppError> {
    args.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Build the JSON:API write document for a todo.
fn todo_document(
    id: Option<&str>,
    attributes: Map<String, Value>,
    assignee_id: Option<&str>,
) -> Value {
    let mut data = json!({
        "type": "todos",
        "attributes": attributes,
    });
    if let Some(id) = id {
        data["id"] = json!(id);
    }
    if let Some(assignee_id) = assignee_id {
        data["relationships"] = json!({
            "assignee": { "data": { "type": "people", "id": assignee_id } }
        });
    }
    json!({ "data": data })
}

fn insert_some(attributes: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        attributes.insert(key.to_string(), json!(value));
    }
}

impl StretyService {
    /// Resolve an optional assignee name into a filtered collection endpoint.
    pub(crate) async fn filtered_endpoint(
        &self,
        collection: &str,
        assignee: Option<&str>,
    ) -> Result<Result<String, UnknownAssignee>, AppError> {
        let Some(name) = assignee else {
            return Ok(Ok(format!("/{}", collection)));
        };

        match self.people().resolve(name).await? {
            Resolution::Found(id) => Ok(Ok(assignee_endpoint(collection, &id))),
            Resolution::NotFound { query, candidates } => {
                Ok(Err(UnknownAssignee::new(&query, candidates)))
            }
        }
    }

    /// Resolve an optional assignee name into a person ID.
    async fn assignee_id(
        &self,
        assignee: Option<&str>,
    ) -> Result<Result<Option<String>, UnknownAssignee>, AppError> {
        let Some(name) = assignee.map(str::trim).filter(|a| !a.is_empty()) else {
            return Ok(Ok(None));
        };

        match self.people().resolve(name).await? {
            Resolution::Found(id) => Ok(Ok(Some(id))),
            Resolution::NotFound { query, candidates } => {
                Ok(Err(UnknownAssignee::new(&query, candidates)))
            }
        }
    }

    /// List todos sorted by due date, open ones only unless asked otherwise.
    pub async fn list_todos(&self, args: &ListArgs) -> Result<Resolved<TodoList>, AppError> {
        let limit = clamp_limit(args.max_results);
        let show_completed = args.show_completed.unwrap_or(false);
        let people = self.people().all().await?;

        let endpoint = match self.filtered_endpoint("todos", args.assignee_query()).await? {
            Ok(endpoint) => endpoint,
            Err(unknown) => return Ok(Resolved::UnknownAssignee(unknown)),
        };

        // Completion status cannot be filtered server-side.
        let todos: Vec<Todo> = pagination::collect(
            self.client(),
            &endpoint,
            |todo: &Todo| show_completed || todo.attributes.completed_at.is_none(),
            limit,
        )
        .await?;

        let mut views: Vec<_> = todos.iter().map(|t| present_todo(t, &people)).collect();
        sort_by_due_date(&mut views, |v| v.due_date.as_deref());

        Ok(Resolved::Done(TodoList {
            count: views.len(),
            todos: views,
            assignee_filter: args.assignee.clone(),
            show_completed,
        }))
    }

    /// Full details of one todo.
    pub async fn get_todo(&self, todo_id: &str) -> Result<TodoDetail, AppError> {
        let endpoint = resource_endpoint("todos", todo_id)?;
        let todo: Document<Todo> = self.client().get_json(&endpoint).await?;
        let people = self.people().all().await?;
        Ok(present_todo_detail(&todo.data, &people))
    }

    /// Live listing of all people (bypasses the cache).
    pub async fn list_people(&self) -> Result<PeopleList, AppError> {
        let people = people::fetch_people(self.client()).await?;
        let people: Vec<_> = people.iter().map(present_person).collect();
        Ok(PeopleList {
            count: people.len(),
            people,
        })
    }

    /// Create a todo, optionally assigned by partial name.
    pub async fn create_todo(
        &self,
        args: &CreateTodoArgs,
    ) -> Result<Resolved<TodoMutation>, AppError> {
        validate(args)?;

        let assignee_id = match self.assignee_id(args.assignee.as_deref()).await? {
            Ok(id) => id,
            Err(unknown) => return Ok(Resolved::UnknownAssignee(unknown)),
        };

        let mut attributes = Map::new();
        attributes.insert("title".to_string(), json!(args.title));
        insert_some(&mut attributes, "description", &args.description);
        insert_some(&mut attributes, "due_date", &args.due_date);
        insert_some(&mut attributes, "priority", &args.priority);

        let body = todo_document(None, attributes, assignee_id.as_deref());
        let response = self
            .client()
            .execute(Method::POST, "/todos", Some(&body), &[])
            .await?;

        tracing::info!(title = %args.title, "Todo created");
        Ok(Resolved::Done(self.mutation_result(response).await?))
    }

    /// Partially update a todo as a conditional write.
    pub async fn update_todo(
        &self,
        args: &UpdateTodoArgs,
    ) -> Result<Resolved<TodoMutation>, AppError> {
        validate(args)?;
        if !args.has_changes() {
            return Err(AppError::BadRequest(
                "at least one field to update is required".to_string(),
            ));
        }
        let endpoint = resource_endpoint("todos", &args.todo_id)?;

        let assignee_id = match self.assignee_id(args.assignee.as_deref()).await? {
            Ok(id) => id,
            Err(unknown) => return Ok(Resolved::UnknownAssignee(unknown)),
        };

        let mut attributes = Map::new();
        insert_some(&mut attributes, "title", &args.title);
        insert_some(&mut attributes, "description", &args.description);
        insert_some(&mut attributes, "due_date", &args.due_date);
        insert_some(&mut attributes, "priority", &args.priority);

        let body = todo_document(
            Some(args.todo_id.trim()),
            attributes,
            assignee_id.as_deref(),
        );
        let response = self.client().conditional_update(&endpoint, &body).await?;

        tracing::info!(todo_id = %args.todo_id, "Todo updated");
        Ok(Resolved::Done(self.mutation_result(response).await?))
    }

    /// Mark a todo complete (`completed_at` = now) or reopen it (`null`).
    pub async fn set_todo_completed(
        &self,
        todo_id: &str,
        completed: bool,
    ) -> Result<TodoMutation, AppError> {
        let endpoint = resource_endpoint("todos", todo_id)?;

        let completed_at = if completed {
            json!(now_rfc3339())
        } else {
            Value::Null
        };
        let mut attributes = Map::new();
        attributes.insert("completed_at".to_string(), completed_at);

        let body = todo_document(Some(todo_id.trim()), attributes, None);
        let response = self.client().conditional_update(&endpoint, &body).await?;

        tracing::info!(todo_id, completed, "Todo completion toggled");
        self.mutation_result(response).await
    }

    pub async fn delete_todo(&self, todo_id: &str) -> Result<DeleteResult, AppError> {
        let endpoint = resource_endpoint("todos", todo_id)?;
        self.client().conditional_delete(&endpoint).await?;

        tracing::info!(todo_id, "Todo deleted");
        Ok(DeleteResult {
            success: true,
            deleted: todo_id.trim().to_string(),
        })
    }

    /// Present the todo echoed back by a write, if Strety sent one.
    async fn mutation_result(&self, response: Value) -> Result<TodoMutation, AppError> {
        let todo = match serde_json::from_value::<Document<Todo>>(response) {
            Ok(doc) => {
                let people = self.people().all().await?;
                Some(present_todo_detail(&doc.data, &people))
            }
            Err(_) => None,
        };
        Ok(TodoMutation {
            success: true,
            todo,
        })
    }
}
