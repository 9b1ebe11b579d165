//! Async façade that performs one round trip per call.
//!
//! `RecordClient` pairs the stateless `StudyRecordApi` with an injected
//! `Transport`. Each method builds a request, executes it, and parses the
//! response. Nothing is cached or retried, and no state is shared between
//! calls, so overlapping calls on the same client are independent.

use tracing::{debug, warn};

use crate::client::{StudyRecordApi, DEFAULT_BASE_URL};
use crate::error::{ApiError, Operation};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    PaginatedResponse, RecordId, StatsMap, StudyRecord, StudyRecordCreate, StudyRecordUpdate,
    StudyStats,
};

#[derive(Debug, Clone)]
pub struct RecordClient<T> {
    api: StudyRecordApi,
    transport: T,
}

impl RecordClient<ReqwestTransport> {
    /// Client over a fresh `reqwest` transport.
    pub fn over_http(base_url: Option<&str>) -> Self {
        Self::new(ReqwestTransport::new(), base_url)
    }
}

impl<T: Transport> RecordClient<T> {
    /// `None` selects `DEFAULT_BASE_URL`.
    pub fn new(transport: T, base_url: Option<&str>) -> Self {
        Self {
            api: StudyRecordApi::new(base_url.unwrap_or(DEFAULT_BASE_URL)),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    pub fn api(&self) -> &StudyRecordApi {
        &self.api
    }

    /// Fetch one page of records, newest first as ordered by the server.
    pub async fn list_records(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<PaginatedResponse<StudyRecord>, ApiError> {
        let request = self.api.build_list_records(page, limit);
        let response = self.send(Operation::ListRecords, request).await?;
        self.finish(self.api.parse_list_records(response))
    }

    /// Fetch every record without pagination.
    pub async fn list_all_records(&self) -> Result<Vec<StudyRecord>, ApiError> {
        let request = self.api.build_list_all_records();
        let response = self.send(Operation::ListAllRecords, request).await?;
        self.finish(self.api.parse_list_all_records(response))
    }

    pub async fn get_record(&self, id: RecordId) -> Result<StudyRecord, ApiError> {
        let request = self.api.build_get_record(id);
        let response = self.send(Operation::GetRecord, request).await?;
        self.finish(self.api.parse_get_record(response))
    }

    pub async fn create_record(&self, input: &StudyRecordCreate) -> Result<StudyRecord, ApiError> {
        let request = self.finish(self.api.build_create_record(input))?;
        let response = self.send(Operation::CreateRecord, request).await?;
        self.finish(self.api.parse_create_record(response))
    }

    /// Apply a partial update; fields left as `None` are not sent.
    pub async fn update_record(
        &self,
        id: RecordId,
        input: &StudyRecordUpdate,
    ) -> Result<StudyRecord, ApiError> {
        let request = self.finish(self.api.build_update_record(id, input))?;
        let response = self.send(Operation::UpdateRecord, request).await?;
        self.finish(self.api.parse_update_record(response))
    }

    pub async fn delete_record(&self, id: RecordId) -> Result<(), ApiError> {
        let request = self.api.build_delete_record(id);
        let response = self.send(Operation::DeleteRecord, request).await?;
        self.finish(self.api.parse_delete_record(response))
    }

    pub async fn get_stats(&self) -> Result<StudyStats, ApiError> {
        let request = self.api.build_get_stats();
        let response = self.send(Operation::GetStats, request).await?;
        self.finish(self.api.parse_get_stats(response))
    }

    pub async fn get_category_stats(&self) -> Result<StatsMap, ApiError> {
        let request = self.api.build_get_category_stats();
        let response = self.send(Operation::GetCategoryStats, request).await?;
        self.finish(self.api.parse_get_category_stats(response))
    }

    pub async fn get_difficulty_stats(&self) -> Result<StatsMap, ApiError> {
        let request = self.api.build_get_difficulty_stats();
        let response = self.send(Operation::GetDifficultyStats, request).await?;
        self.finish(self.api.parse_get_difficulty_stats(response))
    }

    async fn send(
        &self,
        operation: Operation,
        request: HttpRequest,
    ) -> Result<HttpResponse, ApiError> {
        debug!(%operation, method = %request.method, url = %request.url, "sending request");
        match self.transport.execute(request).await {
            Ok(response) => {
                debug!(%operation, status = response.status, "received response");
                Ok(response)
            }
            Err(source) => {
                let err = ApiError::Transport { operation, source };
                warn!(error = %err, "request failed");
                Err(err)
            }
        }
    }

    fn finish<R>(&self, result: Result<R, ApiError>) -> Result<R, ApiError> {
        if let Err(err) = &result {
            warn!(error = %err, status = ?err.status(), "request failed");
        }
        result
    }
}
