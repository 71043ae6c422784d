//! Detection event listing, detail, and live stream against the stub.

mod common;

use domain::{EventFilter, EventKind, PageRequest, Severity};
use serde_json::json;

#[tokio::test]
async fn events_page_decodes_and_normalizes() {
    let state = common::StubState::default();
    *state.events_body.lock().unwrap() = json!([
        {"id": "e1", "logId": "q1", "eventType": "PATTERN", "severity": "HIGH",
         "occurredAt": "2024-02-01T03:12:00", "userId": "bob", "sqlPreview": "DROP TABLE users"},
        {"id": "e2", "logId": "q2", "eventType": "AUTHZ", "severity": "MEDIUM",
         "occurredAt": "2024-02-01T04:00:00"}
    ]);
    let stub = common::spawn_stub(state).await;
    let dir = tempfile::tempdir().unwrap();
    let client = common::seeded_client(stub.addr, &dir);

    let request = PageRequest {
        page: 0,
        size: 50,
        sort: None,
        filter: EventFilter::default(),
    };
    let result = client.fetch_events(&request).await.unwrap();

    assert_eq!(result.total_pages, 1);
    assert_eq!(result.content.len(), 2);
    assert_eq!(result.content[0].event_type, EventKind::Pattern);
    assert_eq!(result.content[1].severity, Severity::Medium);
}

#[tokio::test]
async fn event_filters_serialize_as_query_parameters() {
    let stub = common::spawn_stub(common::StubState::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let client = common::seeded_client(stub.addr, &dir);

    let request = PageRequest {
        page: 1,
        size: 50,
        sort: None,
        filter: EventFilter {
            kind: Some(EventKind::Behavior),
            severity: Some(Severity::High),
            ..EventFilter::default()
        },
    };
    client.fetch_events(&request).await.unwrap();

    let captured = stub.state.captured_for("/api/events");
    assert_eq!(captured[0].query, "type=BEHAVIOR&severity=HIGH&size=50&page=1");
}

#[tokio::test]
async fn unknown_event_detail_is_none() {
    let stub = common::spawn_stub(common::StubState::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let client = common::seeded_client(stub.addr, &dir);

    assert!(client.fetch_event_detail("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn event_detail_includes_log_snapshot() {
    let state = common::StubState::default();
    *state.event_detail_body.lock().unwrap() = Some(json!({
        "id": "e1", "logId": "q1", "eventType": "PATTERN", "severity": "HIGH",
        "occurredAt": "2024-02-01T03:12:00", "sqlRaw": "DROP TABLE users",
        "executedAt": "2024-02-01T03:11:58", "userId": "bob",
        "sqlSummary": "DROP TABLE ...", "returnRows": 0, "status": "FAILURE"
    }));
    let stub = common::spawn_stub(state).await;
    let dir = tempfile::tempdir().unwrap();
    let client = common::seeded_client(stub.addr, &dir);

    let detail = client.fetch_event_detail("e1").await.unwrap().unwrap();
    assert_eq!(detail.sql_raw.as_deref(), Some("DROP TABLE users"));
    assert_eq!(detail.status, Some(domain::QueryStatus::Failure));
    assert!(detail.executed_at.is_some());
}

#[tokio::test]
async fn live_stream_skips_malformed_lines() {
    let state = common::StubState::default();
    *state.stream_body.lock().unwrap() = concat!(
        r#"{"eventId":"e1","type":"PATTERN","severity":"HIGH","occurredAt":"2024-02-01T03:12:00"}"#,
        "\n",
        "{not json}\n",
        "\n",
        r#"data: {"eventId":"e2","type":"BEHAVIOR","severity":"LOW","occurredAt":"2024-02-01T03:13:00"}"#,
        "\n",
    )
    .to_string();
    let stub = common::spawn_stub(state).await;
    let dir = tempfile::tempdir().unwrap();
    let client = common::seeded_client(stub.addr, &dir);

    let mut stream = client.stream_events().await.unwrap();
    let mut ids = Vec::new();
    while let Some(event) = stream.next_event().await.unwrap() {
        ids.push(event.event_id);
    }

    assert_eq!(ids, vec!["e1", "e2"]);
}
