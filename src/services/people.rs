// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! People directory: process-lifetime cache of Strety people.
//!
//! The directory is fetched once on first use and never invalidated, so a
//! person created in Strety afterwards is invisible until restart.

use crate::error::AppError;
use crate::models::Person;
use crate::services::pagination;
use crate::services::strety::StretyClient;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Outcome of resolving a partial name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(String),
    /// Nothing matched; `candidates` lists every known name.
    NotFound {
        query: String,
        candidates: Vec<String>,
    },
}

/// People in fetch order, indexed by ID.
#[derive(Debug, Default)]
pub struct PeopleIndex {
    people: Vec<Person>,
    by_id: HashMap<String, usize>,
}

impl PeopleIndex {
    pub fn new(people: Vec<Person>) -> Self {
        let mut by_id = HashMap::with_capacity(people.len());
        for (idx, person) in people.iter().enumerate() {
            by_id.entry(person.id.clone()).or_insert(idx);
        }
        Self { people, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        self.by_id.get(id).map(|&idx| &self.people[idx])
    }

    /// Display name for a person ID.
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.get(id).map(|p| p.attributes.name.as_str())
    }

    pub fn names(&self) -> Vec<String> {
        self.people
            .iter()
            .map(|p| p.attributes.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Case-insensitive substring match on display names.
    ///
    /// The first match in fetch order wins; ambiguous fragments are not
    /// disambiguated.
    pub fn resolve(&self, partial: &str) -> Resolution {
        let needle = partial.to_lowercase();
        self.people
            .iter()
            .find(|p| p.attributes.name.to_lowercase().contains(&needle))
            .map(|p| Resolution::Found(p.id.clone()))
            .unwrap_or_else(|| Resolution::NotFound {
                query: partial.to_string(),
                candidates: self.names(),
            })
    }
}

/// Lazily filled, shared people cache.
#[derive(Clone)]
pub struct PeopleDirectory {
    client: StretyClient,
    cache: Arc<OnceCell<Arc<PeopleIndex>>>,
}

impl PeopleDirectory {
    pub fn new(client: StretyClient) -> Self {
        Self {
            client,
            cache: Arc::new(OnceCell::new()),
        }
    }

    /// The full directory, fetched on first call.
    ///
    /// Concurrent first callers share one fetch; a failed fetch is not cached.
    pub async fn all(&self) -> Result<Arc<PeopleIndex>, AppError> {
        let index = self
            .cache
            .get_or_try_init(|| async {
                let people = fetch_people(&self.client).await?;
                tracing::info!(count = people.len(), "People cache filled");
                Ok::<_, AppError>(Arc::new(PeopleIndex::new(people)))
            })
            .await?;
        Ok(Arc::clone(index))
    }

    /// Resolve a partial name to a person ID.
    pub async fn resolve(&self, partial: &str) -> Result<Resolution, AppError> {
        Ok(self.all().await?.resolve(partial))
    }

    /// Whether the cache has been filled.
    pub fn is_cached(&self) -> bool {
        self.cache.initialized()
    }
}

/// Fetch every person (all pages) without touching the cache.
pub async fn fetch_people(client: &StretyClient) -> Result<Vec<Person>, AppError> {
    pagination::collect(client, "/people", |_: &Person| true, usize::MAX).await
}
