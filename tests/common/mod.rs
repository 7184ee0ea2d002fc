//! Shared fixtures for integration tests.

use crudbase::{MemoryDatastore, Record, Resource};
use serde::{Deserialize, Serialize};

/// The canonical two-field test record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
}

impl Record for Article {
    fn fields() -> &'static [&'static str] {
        &["id", "title"]
    }
}

/// Record keyed by something other than `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub slug: String,
    pub label: String,
}

impl Record for Tag {
    fn fields() -> &'static [&'static str] {
        &["slug", "label"]
    }

    fn primary_field() -> Option<&'static str> {
        Some("slug")
    }
}

pub fn article_resource() -> (Resource<Article, MemoryDatastore>, MemoryDatastore) {
    let store = MemoryDatastore::new();
    let resource = Resource::new(store.clone()).expect("Article designates a primary field");
    (resource, store)
}

pub fn article(id: &str, title: &str) -> Article {
    Article {
        id: id.into(),
        title: title.into(),
    }
}
