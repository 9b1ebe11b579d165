//! Full CRUD lifecycle against the live mock server, host-does-IO style.
//!
//! # Design
//! Starts the mock server on a random port, then drives every
//! `StudyRecordApi` build/parse pair over real HTTP using ureq. Validates that
//! request building and response parsing agree with the actual server.

mod common;

use study_core::{
    HttpMethod, HttpRequest, HttpResponse, StudyRecordApi, StudyRecordCreate, StudyRecordUpdate,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// decide how to interpret the status.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.url).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.url).call(),
        (HttpMethod::Post, Some(body)) => {
            agent.post(&req.url).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Post, None) => agent.post(&req.url).send_empty(),
        (HttpMethod::Put, Some(body)) => {
            agent.put(&req.url).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Put, None) => agent.put(&req.url).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse::new(status, body)
}

#[test]
fn crud_lifecycle() {
    // Step 1: start mock server on a random port.
    let addr = common::spawn_mock_server();
    let api = StudyRecordApi::new(&common::base_url(addr));

    // Step 2: first page — should be empty.
    let page = api.parse_list_records(execute(api.build_list_records(1, 10))).unwrap();
    assert!(page.items.is_empty(), "expected empty page");
    assert_eq!(page.total_items(), 0);

    // Step 3: create a record.
    let input = StudyRecordCreate {
        title: "X".to_string(),
        category: "Math".to_string(),
        difficulty: 3,
        study_time: 30,
        content: "...".to_string(),
    };
    let req = api.build_create_record(&input).unwrap();
    let created = api.parse_create_record(execute(req)).unwrap();
    assert!(created.id > 0);
    assert_eq!(created.title, input.title);
    assert_eq!(created.category, input.category);
    assert_eq!(created.difficulty, input.difficulty);
    assert_eq!(created.study_time, input.study_time);
    assert_eq!(created.content, input.content);
    assert_eq!(created.created_at, created.updated_at);
    let id = created.id;

    // Step 4: get the created record.
    let fetched = api.parse_get_record(execute(api.build_get_record(id))).unwrap();
    assert_eq!(fetched, created);

    // Step 5: update category only.
    let update = StudyRecordUpdate {
        category: Some("Algebra".to_string()),
        ..Default::default()
    };
    let req = api.build_update_record(id, &update).unwrap();
    let updated = api.parse_update_record(execute(req)).unwrap();
    assert_eq!(updated.category, "Algebra");
    assert_eq!(updated.title, "X");
    assert_eq!(updated.difficulty, 3);

    // Step 6: stats reflect the single record.
    let stats = api.parse_get_stats(execute(api.build_get_stats())).unwrap();
    assert_eq!(stats.total_records, 1);
    assert_eq!(stats.total_study_time, 30);
    assert_eq!(stats.categories.get("Algebra"), Some(&1));

    // Step 7: delete.
    api.parse_delete_record(execute(api.build_delete_record(id))).unwrap();

    // Step 8: get after delete — should be not found.
    let err = api.parse_get_record(execute(api.build_get_record(id))).unwrap_err();
    assert!(err.is_not_found());

    // Step 9: delete again — should be not found.
    let err = api.parse_delete_record(execute(api.build_delete_record(id))).unwrap_err();
    assert!(err.is_not_found());

    // Step 10: full listing — should be empty again.
    let records = api.parse_list_all_records(execute(api.build_list_all_records())).unwrap();
    assert!(records.is_empty(), "expected empty list after delete");
}
