//! Stateless HTTP request builder and response parser for the study-records API.
//!
//! # Design
//! `StudyRecordApi` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Whoever executes the round trip in between (a `Transport`
//! inside `RecordClient`, or the host directly) keeps this layer free of I/O.
//!
//! Successful bodies are decoded and then checked against the schema
//! invariants in `Validate`; anything that fails either step is reported as
//! `ApiError::MalformedResponse`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, Operation};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    PaginatedResponse, RecordId, StatsMap, StudyRecord, StudyRecordCreate, StudyRecordUpdate,
    StudyStats,
};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

const JSON: &str = "application/json";

/// Synchronous, stateless request builder / response parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyRecordApi {
    base_url: String,
}

impl Default for StudyRecordApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl StudyRecordApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_records(&self, page: u32, limit: u32) -> HttpRequest {
        self.get(format!(
            "{}/study-records/paginated?page={page}&limit={limit}",
            self.base_url
        ))
    }

    pub fn build_list_all_records(&self) -> HttpRequest {
        self.get(format!("{}/study-records", self.base_url))
    }

    pub fn build_get_record(&self, id: RecordId) -> HttpRequest {
        self.get(format!("{}/study-records/{id}", self.base_url))
    }

    pub fn build_create_record(&self, input: &StudyRecordCreate) -> Result<HttpRequest, ApiError> {
        self.with_body(
            HttpMethod::Post,
            format!("{}/study-records", self.base_url),
            input,
            Operation::CreateRecord,
        )
    }

    pub fn build_update_record(
        &self,
        id: RecordId,
        input: &StudyRecordUpdate,
    ) -> Result<HttpRequest, ApiError> {
        self.with_body(
            HttpMethod::Put,
            format!("{}/study-records/{id}", self.base_url),
            input,
            Operation::UpdateRecord,
        )
    }

    pub fn build_delete_record(&self, id: RecordId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}/study-records/{id}", self.base_url),
            headers: accept_json(),
            body: None,
        }
    }

    pub fn build_get_stats(&self) -> HttpRequest {
        self.get(format!("{}/study-records/stats/summary", self.base_url))
    }

    pub fn build_get_category_stats(&self) -> HttpRequest {
        self.get(format!("{}/study-records/stats/category", self.base_url))
    }

    pub fn build_get_difficulty_stats(&self) -> HttpRequest {
        self.get(format!("{}/study-records/stats/difficulty", self.base_url))
    }

    pub fn parse_list_records(
        &self,
        response: HttpResponse,
    ) -> Result<PaginatedResponse<StudyRecord>, ApiError> {
        decode(response, Operation::ListRecords)
    }

    pub fn parse_list_all_records(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<StudyRecord>, ApiError> {
        decode(response, Operation::ListAllRecords)
    }

    pub fn parse_get_record(&self, response: HttpResponse) -> Result<StudyRecord, ApiError> {
        decode(response, Operation::GetRecord)
    }

    pub fn parse_create_record(&self, response: HttpResponse) -> Result<StudyRecord, ApiError> {
        decode(response, Operation::CreateRecord)
    }

    pub fn parse_update_record(&self, response: HttpResponse) -> Result<StudyRecord, ApiError> {
        decode(response, Operation::UpdateRecord)
    }

    /// The body of a successful delete is ignored.
    pub fn parse_delete_record(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, Operation::DeleteRecord)
    }

    pub fn parse_get_stats(&self, response: HttpResponse) -> Result<StudyStats, ApiError> {
        decode(response, Operation::GetStats)
    }

    pub fn parse_get_category_stats(&self, response: HttpResponse) -> Result<StatsMap, ApiError> {
        decode(response, Operation::GetCategoryStats)
    }

    pub fn parse_get_difficulty_stats(
        &self,
        response: HttpResponse,
    ) -> Result<StatsMap, ApiError> {
        decode(response, Operation::GetDifficultyStats)
    }

    fn get(&self, url: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: accept_json(),
            body: None,
        }
    }

    fn with_body<T: Serialize>(
        &self,
        method: HttpMethod,
        url: String,
        input: &T,
        operation: Operation,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization {
            operation,
            message: e.to_string(),
        })?;
        let mut headers = accept_json();
        headers.push(("content-type".to_string(), JSON.to_string()));
        Ok(HttpRequest {
            method,
            url,
            headers,
            body: Some(body),
        })
    }
}

fn accept_json() -> Vec<(String, String)> {
    vec![("accept".to_string(), JSON.to_string())]
}

/// Any 2xx is success; everything else becomes `ApiError::Status`.
fn check_status(response: &HttpResponse, operation: Operation) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Status {
        operation,
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T>(response: HttpResponse, operation: Operation) -> Result<T, ApiError>
where
    T: DeserializeOwned + Validate,
{
    check_status(&response, operation)?;
    let value: T =
        serde_json::from_str(&response.body).map_err(|e| ApiError::MalformedResponse {
            operation,
            message: e.to_string(),
        })?;
    value
        .validate()
        .map_err(|message| ApiError::MalformedResponse { operation, message })?;
    Ok(value)
}

/// Schema invariants checked after decoding a response body.
trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for StudyRecord {
    fn validate(&self) -> Result<(), String> {
        if self.id == 0 {
            return Err("record id must be positive".to_string());
        }
        if self.created_at.is_empty() || self.updated_at.is_empty() {
            return Err(format!("record {} is missing timestamps", self.id));
        }
        Ok(())
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), String> {
        self.iter().try_for_each(Validate::validate)
    }
}

impl<T: Validate> Validate for PaginatedResponse<T> {
    fn validate(&self) -> Result<(), String> {
        let p = &self.pagination;
        if p.limit == 0 {
            return Err("pagination limit must be at least 1".to_string());
        }
        if self.items.len() as u64 > u64::from(p.limit) {
            return Err(format!(
                "page holds {} items but limit is {}",
                self.items.len(),
                p.limit
            ));
        }
        let expected_pages = p.total_items.div_ceil(u64::from(p.limit));
        if p.total_pages != expected_pages {
            return Err(format!(
                "total_pages is {} but {} items at limit {} make {expected_pages}",
                p.total_pages, p.total_items, p.limit
            ));
        }
        self.items.validate()
    }
}

impl Validate for StudyStats {
    fn validate(&self) -> Result<(), String> {
        if !self.average_difficulty.is_finite() || self.average_difficulty < 0.0 {
            return Err(format!(
                "average_difficulty {} is out of range",
                self.average_difficulty
            ));
        }
        Ok(())
    }
}

impl Validate for StatsMap {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}
