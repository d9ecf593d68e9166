// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tool channel routes.

use crate::tools::{self, ToolCall, ToolResult, TOOL_NAMES};
use crate::AppState;
use axum::{
    extract::{Json, State},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Tool routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tools", get(list_tools))
        .route("/tools/call", post(call_tool))
}

#[derive(Serialize)]
pub struct ToolListResponse {
    pub tools: Vec<&'static str>,
}

async fn list_tools() -> Json<ToolListResponse> {
    Json(ToolListResponse {
        tools: TOOL_NAMES.to_vec(),
    })
}

/// Run a tool. Always 200: failures are reported inside the result.
async fn call_tool(
    State(state): State<Arc<AppState>>,
    Json(call): Json<ToolCall>,
) -> Json<ToolResult> {
    tracing::info!(tool = %call.name, "Tool call");
    Json(tools::dispatch(&state.strety, call).await)
}
