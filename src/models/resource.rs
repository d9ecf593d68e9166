// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON:API envelopes returned by the Strety API.

use serde::{Deserialize, Deserializer};

/// Single-resource response (`{"data": ...}`).
#[derive(Debug, Clone, Deserialize)]
pub struct Document<T> {
    pub data: T,
}

/// Paginated collection response.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<ListMeta>,
    #[serde(default)]
    pub links: ListLinks,
}

impl<T> ListResponse<T> {
    /// Whether the server advertises another page after this one.
    pub fn has_next(&self) -> bool {
        self.links.next.as_deref().is_some_and(|next| !next.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListMeta {
    pub total_count: Option<u64>,
    pub page_size: Option<u32>,
    pub page_number: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListLinks {
    pub first: Option<String>,
    pub last: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// A JSON:API resource object.
#[derive(Debug, Clone, Deserialize)]
pub struct Resource<A> {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub attributes: A,
    #[serde(default)]
    pub relationships: Relationships,
}

impl<A> Resource<A> {
    /// ID of the assigned person, if any.
    pub fn assignee_id(&self) -> Option<&str> {
        self.relationships
            .assignee
            .as_ref()
            .and_then(|rel| rel.data.as_ref())
            .map(|r| r.id.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Relationships {
    #[serde(default)]
    pub assignee: Option<Relationship>,
    #[serde(default)]
    pub space: Option<Relationship>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<ResourceRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceRef {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Treat an explicit `null` like a missing field.
///
/// Strety occasionally sends `null` for display text; one such item must not
/// fail the whole page.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
