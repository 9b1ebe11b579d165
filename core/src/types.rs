//! Domain DTOs for the study-records API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently,
//! so integration tests catch any drift between the two crates. Mapping keys
//! in the stats payloads are opaque strings; `BTreeMap` keeps iteration order
//! stable.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned record identifier.
pub type RecordId = u64;

/// Category or difficulty bucket → number of records.
pub type StatsMap = BTreeMap<String, u64>;

/// A single study record returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudyRecord {
    pub id: RecordId,
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub category: String,
    pub difficulty: i32,
    /// Minutes spent.
    pub study_time: u32,
    #[serde(deserialize_with = "null_as_empty")]
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Request payload for creating a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudyRecordCreate {
    pub title: String,
    pub category: String,
    pub difficulty: i32,
    pub study_time: u32,
    pub content: String,
}

/// Request payload for updating a record. Only the fields present in the
/// JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudyRecordUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Backends that store `category`/`content` as nullable columns send `null`
/// for unset values; those read as empty strings. The key stays required.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Aggregate statistics over every stored record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudyStats {
    pub total_records: u64,
    pub total_study_time: u64,
    pub average_difficulty: f64,
    #[serde(default)]
    pub categories: StatsMap,
    #[serde(default)]
    pub difficulties: StatsMap,
}

/// Pagination metadata accompanying a page of items.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

/// One page of items plus metadata describing the full collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    pub fn page(&self) -> u32 {
        self.pagination.page
    }

    pub fn limit(&self) -> u32 {
        self.pagination.limit
    }

    pub fn total_items(&self) -> u64 {
        self.pagination.total_items
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.pagination.page) < self.pagination.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.pagination.page > 1
    }
}
