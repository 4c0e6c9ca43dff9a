#![allow(clippy::unwrap_used)]
// Failure-policy tests for the collector: a failed per-service call
// degrades its section and the run continues; a rejected token aborts.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use graphly_api::GraphClient;
use graphly_core::{CollectOptions, CoreError, RunLog, collect};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GraphClient) {
    let server = MockServer::start().await;
    let client = GraphClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn page(value: serde_json::Value) -> serde_json::Value {
    json!({ "value": value })
}

async fn mount_get(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

/// Mount a healthy tenant on every endpoint a `--skip-teams
/// --skip-planner` collection touches.
async fn mount_healthy_tenant(server: &MockServer) {
    mount_get(
        server,
        "/organization",
        ResponseTemplate::new(200).set_body_json(page(json!([{
            "id": "tenant-guid",
            "displayName": "Contoso Ltd",
            "verifiedDomains": [{ "name": "contoso.com", "isDefault": true }]
        }]))),
    )
    .await;
    mount_get(
        server,
        "/users",
        ResponseTemplate::new(200).set_body_json(page(json!([{
            "id": "11111111-1111-1111-1111-111111111111",
            "displayName": "Alice",
            "userPrincipalName": "alice@contoso.com",
            "accountEnabled": true,
            "userType": "Member"
        }]))),
    )
    .await;
    mount_get(
        server,
        "/subscribedSkus",
        ResponseTemplate::new(200).set_body_json(page(json!([{
            "skuId": "05e9a617-0261-4cee-bb44-138d3ef5d965",
            "skuPartNumber": "SPE_E3",
            "consumedUnits": 10,
            "prepaidUnits": { "enabled": 12, "suspended": 0, "warning": 0 }
        }]))),
    )
    .await;
    mount_get(
        server,
        "/reports/getMailboxUsageDetail(period='D180')",
        ResponseTemplate::new(200).set_body_json(page(json!([{
            "displayName": "Alice",
            "userPrincipalName": "alice@contoso.com",
            "storageUsedInBytes": 5_368_709_120u64,
            "recipientType": "UserMailbox",
            "hasArchive": false,
            "isDeleted": false
        }]))),
    )
    .await;
    mount_get(
        server,
        "/reports/getOneDriveUsageAccountDetail(period='D180')",
        ResponseTemplate::new(200).set_body_json(page(json!([{
            "ownerDisplayName": "Alice",
            "ownerPrincipalName": "alice@contoso.com",
            "storageUsedInBytes": 1_073_741_824u64,
            "isDeleted": false
        }]))),
    )
    .await;
    mount_get(
        server,
        "/reports/getSharePointSiteUsageDetail(period='D180')",
        ResponseTemplate::new(200).set_body_json(page(json!([]))),
    )
    .await;
}

fn options() -> CollectOptions {
    CollectOptions {
        skip_teams: true,
        skip_planner: true,
        ..CollectOptions::default()
    }
}

// ── Per-service degradation ─────────────────────────────────────────

#[tokio::test]
async fn denied_report_degrades_its_section_and_run_continues() {
    let (server, client) = setup().await;

    // First mounted mock wins: the 403 shadows the healthy mailbox mount.
    Mock::given(method("GET"))
        .and(path("/reports/getMailboxUsageDetail(period='D180')"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": "S2SUnauthorized", "message": "Invalid permission." }
        })))
        .mount(&server)
        .await;
    mount_healthy_tenant(&server).await;

    let mut log = RunLog::new();
    let snapshot = collect(&client, &options(), &mut log).await.unwrap();

    // Both mailbox-derived sections are marked, nothing else degrades.
    assert!(!snapshot.mailboxes.is_available());
    assert!(!snapshot.mailbox_counts.is_available());
    assert!(snapshot.organization.is_available());
    assert!(snapshot.users.is_available());
    assert!(snapshot.skus.is_available());
    assert!(snapshot.drives.is_available());
    assert!(snapshot.sites.is_available());
    assert_eq!(log.warning_count(), 1);
}

#[tokio::test]
async fn healthy_tenant_collects_every_section() {
    let (server, client) = setup().await;
    mount_healthy_tenant(&server).await;

    let mut log = RunLog::new();
    let snapshot = collect(&client, &options(), &mut log).await.unwrap();

    assert!(snapshot.mailboxes.is_available());
    assert!(snapshot.drives.is_available());
    assert!(snapshot.sites.is_available());
    assert_eq!(log.warning_count(), 0);
    // Skipped sub-analyses are absent, not degraded.
    assert!(snapshot.collaboration.is_none());
    assert!(snapshot.planner.is_none());
}

// ── Fatal auth abort ────────────────────────────────────────────────

#[tokio::test]
async fn rejected_token_aborts_the_run() {
    let (server, client) = setup().await;

    // Organization is the first call; a dead token fails it with 401.
    mount_get(
        &server,
        "/organization",
        ResponseTemplate::new(401).set_body_string("token expired"),
    )
    .await;

    let mut log = RunLog::new();
    let result = collect(&client, &options(), &mut log).await;

    assert!(
        matches!(result, Err(CoreError::TokenRejected)),
        "expected TokenRejected, got: {result:?}"
    );
}

#[tokio::test]
async fn missing_scope_group_aborts_before_collection() {
    let (server, client) = setup().await;

    mount_get(
        &server,
        "/groups",
        ResponseTemplate::new(200).set_body_json(page(json!([]))),
    )
    .await;

    let opts = CollectOptions {
        group_filter: Some("No Such Team".into()),
        ..options()
    };
    let mut log = RunLog::new();
    let result = collect(&client, &opts, &mut log).await;

    assert!(
        matches!(result, Err(CoreError::GroupNotFound { ref name }) if name == "No Such Team"),
        "expected GroupNotFound, got: {result:?}"
    );
}
