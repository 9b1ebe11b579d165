//! Client core for the study-records backend.
//!
//! # Overview
//! Two layers over the same wire contract:
//! - `StudyRecordApi` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network (host-does-IO pattern).
//! - `RecordClient` pairs it with an injected `Transport` and performs one
//!   round trip per async call.
//!
//! # Design
//! - Both layers are stateless apart from an immutable `base_url`.
//! - Every error names the `Operation` it came from; protocol failures keep
//!   the status code, and undecodable or inconsistent bodies are reported as
//!   `ApiError::MalformedResponse`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod service;
pub mod transport;
pub mod types;

pub use client::{StudyRecordApi, DEFAULT_BASE_URL};
pub use error::{ApiError, Operation, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::RecordClient;
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    PaginatedResponse, Pagination, RecordId, StatsMap, StudyRecord, StudyRecordCreate,
    StudyRecordUpdate, StudyStats,
};
