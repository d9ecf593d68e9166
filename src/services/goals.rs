// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Goal operations (read-only).

use crate::error::AppError;
use crate::models::{Document, Goal, GoalList, GoalView, Resolved};
use crate::services::pagination::{self, clamp_limit, sort_by_due_date};
use crate::services::presenters::present_goal;
use crate::services::strety::StretyService;
use crate::services::todos::{resource_endpoint, ListArgs};

impl StretyService {
    /// List goals with the same filters and ordering as todos.
    pub async fn list_goals(&self, args: &ListArgs) -> Result<Resolved<GoalList>, AppError> {
        let limit = clamp_limit(args.max_results);
        let show_completed = args.show_completed.unwrap_or(false);
        let people = self.people().all().await?;

        let endpoint = match self.filtered_endpoint("goals", args.assignee_query()).await? {
            Ok(endpoint) => endpoint,
            Err(unknown) => return Ok(Resolved::UnknownAssignee(unknown)),
        };

        let goals: Vec<Goal> = pagination::collect(
            self.client(),
            &endpoint,
            |goal: &Goal| show_completed || goal.attributes.completed_at.is_none(),
            limit,
        )
        .await?;

        let mut views: Vec<_> = goals.iter().map(|g| present_goal(g, &people)).collect();
        sort_by_due_date(&mut views, |v| v.due_date.as_deref());

        Ok(Resolved::Done(GoalList {
            count: views.len(),
            goals: views,
            assignee_filter: args.assignee.clone(),
            show_completed,
        }))
    }

    pub async fn get_goal(&self, goal_id: &str) -> Result<GoalView, AppError> {
        let endpoint = resource_endpoint("goals", goal_id)?;
        let goal: Document<Goal> = self.client().get_json(&endpoint).await?;
        let people = self.people().all().await?;
        Ok(present_goal(&goal.data, &people))
    }
}
