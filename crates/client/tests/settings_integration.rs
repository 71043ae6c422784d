//! Alert settings read/write against the stub backend.

mod common;

use client::ClientError;
use domain::AlertSettings;
use serde_json::json;

#[tokio::test]
async fn prefill_reads_current_settings_with_admin_header() {
    let stub = common::spawn_stub(common::StubState::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let client = common::seeded_client(stub.addr, &dir);

    let settings = client.fetch_alert_settings().await.unwrap();
    assert_eq!(settings.email.as_deref(), Some(common::TEST_EMAIL));
    assert!(settings.slack_webhook.is_none());

    let captured = stub.state.captured_for("/api/settings/alerts");
    assert_eq!(captured[0].admin_email.as_deref(), Some(common::TEST_EMAIL));
}

#[tokio::test]
async fn patch_carries_only_provided_fields() {
    let stub = common::spawn_stub(common::StubState::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let client = common::seeded_client(stub.addr, &dir);

    let settings = AlertSettings::from_input(Some("alerts@example.com"), None);
    client.update_alert_settings(&settings).await.unwrap();

    let captured = stub.state.captured_for("/api/settings/alerts");
    let patch = captured.iter().find(|c| c.method == "PATCH").unwrap();
    assert_eq!(
        patch.body.as_ref().unwrap(),
        &json!({ "email": "alerts@example.com" })
    );
    assert_eq!(patch.admin_email.as_deref(), Some(common::TEST_EMAIL));
}

#[tokio::test]
async fn invalid_settings_never_reach_the_network() {
    let stub = common::spawn_stub(common::StubState::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let client = common::seeded_client(stub.addr, &dir);

    // Wrong webhook host.
    let bad = AlertSettings::from_input(None, Some("https://example.com/hook"));
    assert!(matches!(
        client.update_alert_settings(&bad).await.unwrap_err(),
        ClientError::Validation(_)
    ));

    // Neither channel provided.
    let empty = AlertSettings::from_input(Some("  "), None);
    assert!(matches!(
        client.update_alert_settings(&empty).await.unwrap_err(),
        ClientError::Validation(_)
    ));

    assert!(stub
        .state
        .captured_for("/api/settings/alerts")
        .iter()
        .all(|c| c.method != "PATCH"));
}
