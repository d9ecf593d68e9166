// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Mapping from Strety resources to the flat shapes returned to callers.

use crate::models::{Goal, GoalView, Person, PersonView, Todo, TodoDetail, TodoView};
use crate::services::people::PeopleIndex;

fn assignee_name<A>(resource: &crate::models::Resource<A>, people: &PeopleIndex) -> Option<String> {
    resource
        .assignee_id()
        .and_then(|id| people.name_of(id))
        .map(str::to_string)
}

pub fn present_todo(todo: &Todo, people: &PeopleIndex) -> TodoView {
    let attrs = &todo.attributes;
    TodoView {
        id: todo.id.clone(),
        title: attrs.title.clone(),
        due_date: attrs.due_date.clone(),
        priority: attrs.priority.clone(),
        completed: attrs.completed_at.is_some(),
        completed_at: attrs.completed_at.clone(),
        assignee: assignee_name(todo, people),
        description: attrs.description.clone(),
        created_at: attrs.created_at.clone(),
        updated_at: attrs.updated_at.clone(),
    }
}

pub fn present_todo_detail(todo: &Todo, people: &PeopleIndex) -> TodoDetail {
    let attrs = &todo.attributes;
    TodoDetail {
        id: todo.id.clone(),
        title: attrs.title.clone(),
        description: attrs.description.clone(),
        description_html: attrs.description_html.clone(),
        due_date: attrs.due_date.clone(),
        priority: attrs.priority.clone(),
        completed: attrs.completed_at.is_some(),
        completed_at: attrs.completed_at.clone(),
        assignee: assignee_name(todo, people),
        created_at: attrs.created_at.clone(),
        updated_at: attrs.updated_at.clone(),
    }
}

pub fn present_goal(goal: &Goal, people: &PeopleIndex) -> GoalView {
    let attrs = &goal.attributes;
    GoalView {
        id: goal.id.clone(),
        title: attrs.title.clone(),
        due_date: attrs.due_date.clone(),
        status: attrs.status.clone(),
        completed: attrs.completed_at.is_some(),
        completed_at: attrs.completed_at.clone(),
        assignee: assignee_name(goal, people),
        description: attrs.description.clone(),
        created_at: attrs.created_at.clone(),
        updated_at: attrs.updated_at.clone(),
    }
}

pub fn present_person(person: &Person) -> PersonView {
    PersonView {
        id: person.id.clone(),
        name: person.attributes.name.clone(),
        email: person.attributes.email.clone(),
    }
}
