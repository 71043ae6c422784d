//! StatsAggregator behavior against the stub backend.

mod common;

use client::StatsAggregator;
use domain::DateRange;
use serde_json::json;

fn range() -> DateRange {
    DateRange::parse(Some("2024-01-01"), Some("2024-01-07"))
}

#[tokio::test]
async fn server_summaries_are_preferred_over_fallback() {
    let state = common::StubState::default();
    *state.user_summary_body.lock().unwrap() = json!({
        "users": [
            {"userId": "alice", "count": 5},
            {"userId": "bob", "total": 2}
        ]
    });
    *state.hour_summary_body.lock().unwrap() = json!({
        "times": [
            {"hour": "2024-01-02T09:00", "total": 3},
            {"hour": "2024-01-02T15:00", "total": 1}
        ]
    });
    let stub = common::spawn_stub(state).await;
    let dir = tempfile::tempdir().unwrap();
    let aggregator = StatsAggregator::new(common::test_client(stub.addr, &dir));

    let stats = aggregator.load(range()).await;

    assert_eq!(stats.by_user.len(), 2);
    assert_eq!(stats.by_user[0].user_id, "alice");
    assert_eq!(stats.by_hour.len(), 24);
    assert_eq!(stats.by_hour[9].count, 3);
    assert_eq!(stats.by_hour[15].count, 1);
    assert!(stats.error.is_none());

    // No bulk fetch happened.
    assert!(stub.state.captured_for("/api/logs").is_empty());
    let summaries = stub.state.captured_for("/api/logs/summary");
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|c| c.query.contains("from=2024-01-01")));
}

#[tokio::test]
async fn empty_user_summary_falls_back_to_bulk_fetch() {
    let state = common::StubState::default();
    *state.hour_summary_body.lock().unwrap() = json!({
        "times": [{"hour": "09:00", "count": 1}]
    });
    *state.logs_body.lock().unwrap() = json!([
        {"id": "q1", "userId": "alice", "executedAt": "2024-01-02T09:00:00", "status": "SUCCESS", "returnRows": 1},
        {"id": "q2", "userId": "alice", "executedAt": "2024-01-02T10:00:00", "status": "SUCCESS", "returnRows": 1},
        {"id": "q3", "userId": "", "executedAt": "2024-01-02T11:00:00", "status": "FAILURE", "returnRows": 0}
    ]);
    let stub = common::spawn_stub(state).await;
    let dir = tempfile::tempdir().unwrap();
    let aggregator = StatsAggregator::new(common::test_client(stub.addr, &dir));

    let stats = aggregator.load(range()).await;

    // Fallback computed users: blank id coalesced, nothing dropped.
    assert_eq!(stats.by_user.len(), 2);
    assert_eq!(stats.by_user[0].user_id, "alice");
    assert_eq!(stats.by_user[0].count, 2);
    assert!(stats
        .by_user
        .iter()
        .any(|b| b.user_id == "(unknown)" && b.count == 1));

    // Hour series stays the server-provided one, zero-filled to 24.
    assert_eq!(stats.by_hour.len(), 24);
    assert_eq!(stats.by_hour[9].count, 1);

    let bulk = stub.state.captured_for("/api/logs");
    assert_eq!(bulk.len(), 1);
    assert!(bulk[0].query.contains("size=1000"));
    assert!(bulk[0].query.contains("sort=executedAt%2CDESC"));
    assert!(bulk[0].query.contains("page=0"));
}

#[tokio::test]
async fn unrecognized_summary_shape_degrades_to_fallback() {
    let state = common::StubState::default();
    *state.user_summary_body.lock().unwrap() = json!({ "rows": 7 });
    *state.hour_summary_body.lock().unwrap() = json!({ "rows": 7 });
    *state.logs_body.lock().unwrap() = json!([
        {"id": "q1", "userId": "alice", "executedAt": "2024-01-02T09:00:00", "status": "SUCCESS", "returnRows": 1}
    ]);
    let stub = common::spawn_stub(state).await;
    let dir = tempfile::tempdir().unwrap();
    let aggregator = StatsAggregator::new(common::test_client(stub.addr, &dir));

    let stats = aggregator.load(range()).await;

    assert_eq!(stats.by_user.len(), 1);
    assert_eq!(stats.by_hour.len(), 24);
    assert_eq!(stats.by_hour[9].count, 1);
    assert_eq!(stub.state.captured_for("/api/logs").len(), 1);
}

#[tokio::test]
async fn completely_empty_data_yields_series_and_indicator() {
    let stub = common::spawn_stub(common::StubState::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let aggregator = StatsAggregator::new(common::test_client(stub.addr, &dir));

    let stats = aggregator.load(range()).await;

    assert!(stats.by_user.is_empty());
    assert_eq!(stats.by_hour.len(), 24);
    assert!(stats.by_hour.iter().all(|b| b.count == 0));
    assert!(stats.error.is_some());
}

#[tokio::test]
async fn user_buckets_truncate_to_top_ten() {
    let state = common::StubState::default();
    let rows: Vec<_> = (0..12)
        .flat_map(|u| {
            // user-N appears N+1 times
            (0..=u).map(move |i| {
                json!({
                    "id": format!("q-{u}-{i}"),
                    "userId": format!("user-{u:02}"),
                    "executedAt": "2024-01-02T09:00:00",
                    "status": "SUCCESS",
                    "returnRows": 1
                })
            })
        })
        .collect();
    *state.logs_body.lock().unwrap() = json!(rows);
    let stub = common::spawn_stub(state).await;
    let dir = tempfile::tempdir().unwrap();
    let aggregator = StatsAggregator::new(common::test_client(stub.addr, &dir));

    let stats = aggregator.load(range()).await;

    assert_eq!(stats.by_user.len(), 10);
    assert_eq!(stats.by_user[0].user_id, "user-11");
    assert_eq!(stats.by_user[0].count, 12);
    // Descending by count throughout.
    assert!(stats.by_user.windows(2).all(|w| w[0].count >= w[1].count));
    assert_eq!(stats.total(), (3..=12).sum::<u64>());
    assert_eq!(stats.top_user().unwrap().user_id, "user-11");
}
