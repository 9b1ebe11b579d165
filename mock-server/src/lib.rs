use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 50;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudyRecord {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub difficulty: i32,
    pub study_time: u32,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize)]
pub struct StudyRecordCreate {
    pub title: String,
    pub category: String,
    pub difficulty: i32,
    pub study_time: u32,
    pub content: String,
}

#[derive(Deserialize)]
pub struct StudyRecordUpdate {
    pub title: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<i32>,
    pub study_time: Option<u32>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<StudyRecord>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StudyStats {
    pub total_records: u64,
    pub total_study_time: u64,
    pub average_difficulty: f64,
    pub categories: BTreeMap<String, u64>,
    pub difficulties: BTreeMap<String, u64>,
}

#[derive(Deserialize)]
pub struct PageParams {
    page: Option<String>,
    limit: Option<String>,
}

/// Unparseable or out-of-range values fall back instead of rejecting.
fn page_and_limit(params: &PageParams) -> (u32, u32) {
    let parse = |raw: &Option<String>| raw.as_deref().and_then(|v| v.trim().parse::<u32>().ok());
    let page = parse(&params.page).filter(|p| *p >= 1).unwrap_or(1);
    let limit = parse(&params.limit)
        .filter(|l| (1..=MAX_LIMIT).contains(l))
        .unwrap_or(DEFAULT_LIMIT);
    (page, limit)
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    records: BTreeMap<u64, StudyRecord>,
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/study-records", get(list_records).post(create_record))
        .route("/study-records/paginated", get(list_records_paginated))
        .route("/study-records/stats/summary", get(stats_summary))
        .route("/study-records/stats/category", get(stats_by_category))
        .route("/study-records/stats/difficulty", get(stats_by_difficulty))
        .route(
            "/study-records/{id}",
            get(get_record).put(update_record).delete(delete_record),
        );
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .with_state(db)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn error(status: StatusCode, detail: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": detail })))
}

fn not_found() -> (StatusCode, Json<Value>) {
    error(StatusCode::NOT_FOUND, "study record not found")
}

fn check_fields(title: Option<&str>, difficulty: Option<i32>) -> ApiResult<()> {
    if title.is_some_and(|t| t.trim().is_empty()) {
        return Err(error(StatusCode::UNPROCESSABLE_ENTITY, "title must not be empty"));
    }
    if difficulty.is_some_and(|d| !(1..=5).contains(&d)) {
        return Err(error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "difficulty must be between 1 and 5",
        ));
    }
    Ok(())
}

/// Newest first; ids increase monotonically.
fn newest_first(store: &Store) -> Vec<StudyRecord> {
    store.records.values().rev().cloned().collect()
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn list_records(State(db): State<Db>) -> Json<Vec<StudyRecord>> {
    Json(newest_first(&*db.read().await))
}

async fn list_records_paginated(
    State(db): State<Db>,
    Query(params): Query<PageParams>,
) -> Json<Page> {
    let (page, limit) = page_and_limit(&params);

    let all = newest_first(&*db.read().await);
    let total_items = all.len() as u64;
    let total_pages = total_items.div_ceil(u64::from(limit));
    let start = (u64::from(page) - 1).saturating_mul(u64::from(limit));
    let items = all
        .into_iter()
        .skip(usize::try_from(start).unwrap_or(usize::MAX))
        .take(limit as usize)
        .collect();

    Json(Page {
        items,
        pagination: Pagination {
            page,
            limit,
            total_items,
            total_pages,
        },
    })
}

async fn create_record(
    State(db): State<Db>,
    Json(input): Json<StudyRecordCreate>,
) -> ApiResult<(StatusCode, Json<StudyRecord>)> {
    check_fields(Some(input.title.as_str()), Some(input.difficulty))?;
    let mut store = db.write().await;
    store.next_id += 1;
    let timestamp = now();
    let record = StudyRecord {
        id: store.next_id,
        title: input.title,
        category: input.category,
        difficulty: input.difficulty,
        study_time: input.study_time,
        content: input.content,
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    store.records.insert(record.id, record.clone());
    tracing::debug!(id = record.id, "created study record");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Json<StudyRecord>> {
    let store = db.read().await;
    store.records.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_record(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<StudyRecordUpdate>,
) -> ApiResult<Json<StudyRecord>> {
    if input.title.is_none()
        && input.category.is_none()
        && input.difficulty.is_none()
        && input.study_time.is_none()
        && input.content.is_none()
    {
        return Err(error(StatusCode::BAD_REQUEST, "no fields to update"));
    }
    check_fields(input.title.as_deref(), input.difficulty)?;

    let mut store = db.write().await;
    let record = store.records.get_mut(&id).ok_or_else(not_found)?;
    if let Some(title) = input.title {
        record.title = title;
    }
    if let Some(category) = input.category {
        record.category = category;
    }
    if let Some(difficulty) = input.difficulty {
        record.difficulty = difficulty;
    }
    if let Some(study_time) = input.study_time {
        record.study_time = study_time;
    }
    if let Some(content) = input.content {
        record.content = content;
    }
    record.updated_at = now();
    Ok(Json(record.clone()))
}

async fn delete_record(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .records
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(not_found)
}

pub fn summarize(records: &[StudyRecord]) -> StudyStats {
    let total_records = records.len() as u64;
    let total_study_time = records.iter().map(|r| u64::from(r.study_time)).sum();
    let average_difficulty = if records.is_empty() {
        0.0
    } else {
        let sum: i64 = records.iter().map(|r| i64::from(r.difficulty)).sum();
        (sum as f64 / records.len() as f64 * 100.0).round() / 100.0
    };
    StudyStats {
        total_records,
        total_study_time,
        average_difficulty,
        categories: count_by(records, |r| r.category.clone()),
        difficulties: count_by(records, |r| r.difficulty.to_string()),
    }
}

fn count_by(records: &[StudyRecord], key: impl Fn(&StudyRecord) -> String) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(key(record)).or_insert(0) += 1;
    }
    counts
}

async fn stats_summary(State(db): State<Db>) -> Json<StudyStats> {
    Json(summarize(&newest_first(&*db.read().await)))
}

async fn stats_by_category(State(db): State<Db>) -> Json<BTreeMap<String, u64>> {
    Json(summarize(&newest_first(&*db.read().await)).categories)
}

async fn stats_by_difficulty(State(db): State<Db>) -> Json<BTreeMap<String, u64>> {
    Json(summarize(&newest_first(&*db.read().await)).difficulties)
}
