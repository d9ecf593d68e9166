// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tool dispatch: maps a tool name and JSON arguments onto a Strety
//! operation and turns every outcome into a uniform result.
//!
//! Nothing fails past this boundary; errors become `is_error` results.

use crate::error::AppError;
use crate::services::{CreateTodoArgs, ListArgs, StretyService, UpdateTodoArgs};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const LIST_TODOS: &str = "strety_list_todos";
pub const GET_TODO: &str = "strety_get_todo";
pub const LIST_PEOPLE: &str = "strety_list_people";
pub const LIST_GOALS: &str = "strety_list_goals";
pub const GET_GOAL: &str = "strety_get_goal";
pub const CREATE_TODO: &str = "strety_create_todo";
pub const UPDATE_TODO: &str = "strety_update_todo";
pub const COMPLETE_TODO: &str = "strety_complete_todo";
pub const UNCOMPLETE_TODO: &str = "strety_uncomplete_todo";
pub const DELETE_TODO: &str = "strety_delete_todo";

/// Every tool this server answers to.
pub const TOOL_NAMES: &[&str] = &[
    LIST_TODOS,
    GET_TODO,
    LIST_PEOPLE,
    LIST_GOALS,
    GET_GOAL,
    CREATE_TODO,
    UPDATE_TODO,
    COMPLETE_TODO,
    UNCOMPLETE_TODO,
    DELETE_TODO,
];

/// A tool invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Outcome of a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: String) -> Self {
        Self {
            content: vec![ToolContent {
                kind: "text".to_string(),
                text,
            }],
            is_error: false,
        }
    }

    pub fn error(err: &AppError) -> Self {
        Self {
            is_error: true,
            ..Self::text(format!("Error: {}", err))
        }
    }

    /// The text of the first content block.
    pub fn first_text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or("")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TodoIdArgs {
    todo_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoalIdArgs {
    goal_id: String,
}

/// Run one tool call.
pub async fn dispatch(service: &StretyService, call: ToolCall) -> ToolResult {
    match run(service, &call.name, call.arguments).await {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => ToolResult::text(text),
            Err(e) => ToolResult::error(&AppError::Internal(e.into())),
        },
        Err(e) => {
            tracing::warn!(tool = %call.name, error = %e, "Tool call failed");
            ToolResult::error(&e)
        }
    }
}

async fn run(service: &StretyService, name: &str, arguments: Value) -> Result<Value, AppError> {
    match name {
        LIST_TODOS => {
            let args: ListArgs = parse_args(arguments)?;
            to_value(service.list_todos(&args).await?)
        }
        GET_TODO => {
            let args: TodoIdArgs = parse_args(arguments)?;
            to_value(service.get_todo(&args.todo_id).await?)
        }
        LIST_PEOPLE => to_value(service.list_people().await?),
        LIST_GOALS => {
            let args: ListArgs = parse_args(arguments)?;
            to_value(service.list_goals(&args).await?)
        }
        GET_GOAL => {
            let args: GoalIdArgs = parse_args(arguments)?;
            to_value(service.get_goal(&args.goal_id).await?)
        }
        CREATE_TODO => {
            let args: CreateTodoArgs = parse_args(arguments)?;
            to_value(service.create_todo(&args).await?)
        }
        UPDATE_TODO => {
            let args: UpdateTodoArgs = parse_args(arguments)?;
            to_value(service.update_todo(&args).await?)
        }
        COMPLETE_TODO => {
            let args: TodoIdArgs = parse_args(arguments)?;
            to_value(service.set_todo_completed(&args.todo_id, true).await?)
        }
        UNCOMPLETE_TODO => {
            let args: TodoIdArgs = parse_args(arguments)?;
            to_value(service.set_todo_completed(&args.todo_id, false).await?)
        }
        DELETE_TODO => {
            let args: TodoIdArgs = parse_args(arguments)?;
            to_value(service.delete_todo(&args.todo_id).await?)
        }
        other => Err(AppError::BadRequest(format!("Unknown tool: {}", other))),
    }
}

/// Deserialize tool arguments; a missing argument object counts as `{}`.
fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, AppError> {
    let arguments = if arguments.is_null() {
        Value::Object(Default::default())
    } else {
        arguments
    };
    serde_json::from_value(arguments)
        .map_err(|e| AppError::BadRequest(format!("Invalid arguments: {}", e)))
}

fn to_value<T: Serialize>(value: T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_args_null_is_empty_object() {
        let args: ListArgs = parse_args(Value::Null).unwrap();
        assert_eq!(args.max_results, None);
    }

    #[test]
    fn test_parse_args_missing_required_field() {
        let result: Result<TodoIdArgs, _> = parse_args(json!({}));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_error_result_is_flagged() {
        let result = ToolResult::error(&AppError::AuthenticationFailed);
        assert!(result.is_error);
        assert!(result.first_text().starts_with("Error: Authentication failed"));
    }
}
