//! End-to-end tests over a real listener.
//!
//! Each test starts a server on an ephemeral port with a disposable dist
//! directory and log sinks, then drives it with a plain HTTP client.

use spa_edge_common::EdgeConfig;
use spa_edge_server::EdgeServer;

const INDEX_HTML: &str = "<!doctype html>\
    <html><head><title>app</title></head>\
    <body><div id=\"root\"></div><script src=\"/assets/app-9d41be.js\"></script></body></html>";
const ASSET_JS: &str = "console.log(\"content-hashed build artifact\");\n";

fn test_config(dir: &tempfile::TempDir) -> EdgeConfig {
    let dist = dir.path().join("dist");
    std::fs::create_dir_all(dist.join("assets")).unwrap();
    std::fs::write(dist.join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(dist.join("assets/app-9d41be.js"), ASSET_JS).unwrap();

    let mut config = EdgeConfig::default();
    config.site.dist_dir = dist;
    config.telemetry_log.flat_file = dir.path().join("telemetry.log");
    config.telemetry_log.rotate_dir = dir.path().join("logs");
    config
}

#[tokio::test]
async fn serves_fallback_document_for_client_routes() {
    let dir = tempfile::tempdir().unwrap();
    let handle = EdgeServer::start_test(&test_config(&dir)).await.unwrap();
    let client = reqwest::Client::new();

    // `/telemetry` is only claimed for POST; a GET falls through to the
    // document like any other client-side route.
    for path in ["/", "/settings/profile", "/telemetry"] {
        let resp = client
            .get(format!("{}{path}", handle.url()))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200, "path: {path}");
        assert_eq!(resp.headers()["x-frame-options"], "DENY");
        assert_eq!(resp.text().await.unwrap(), INDEX_HTML, "path: {path}");
    }

    handle.shutdown().await;
}

#[tokio::test]
async fn serves_assets_with_immutable_cache_policy() {
    let dir = tempfile::tempdir().unwrap();
    let handle = EdgeServer::start_test(&test_config(&dir)).await.unwrap();
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/assets/app-9d41be.js", handle.url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["cache-control"],
        "public, max-age=31536000, immutable"
    );
    assert_eq!(resp.text().await.unwrap(), ASSET_JS);

    let missing = client
        .get(format!("{}/assets/gone.js", handle.url()))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
    assert_ne!(missing.text().await.unwrap(), INDEX_HTML);

    handle.shutdown().await;
}

#[tokio::test]
async fn telemetry_lands_in_both_sinks() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let handle = EdgeServer::start_test(&config).await.unwrap();
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/telemetry", handle.url()))
        .header("content-type", "application/json")
        .body(r#"{"error":"window.foo is undefined","url":"/settings"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);
    assert!(resp.text().await.unwrap().is_empty());

    handle.shutdown().await;

    let flat = std::fs::read_to_string(&config.telemetry_log.flat_file).unwrap();
    assert_eq!(flat.lines().count(), 1);
    let entry: serde_json::Value = serde_json::from_str(flat.lines().next().unwrap()).unwrap();
    assert_eq!(entry["level"], "info");
    assert_eq!(entry["telemetry"]["error"], "window.foo is undefined");
    assert!(entry["timestamp"].is_string());

    let partitions: Vec<_> = std::fs::read_dir(&config.telemetry_log.rotate_dir)
        .unwrap()
        .flatten()
        .collect();
    assert_eq!(partitions.len(), 1);
    assert_eq!(std::fs::read_to_string(partitions[0].path()).unwrap(), flat);
}

#[tokio::test]
async fn telemetry_quota_is_ten_per_minute() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let handle = EdgeServer::start_test(&config).await.unwrap();
    let client = reqwest::Client::new();

    for i in 0..10 {
        let resp = client
            .post(format!("{}/telemetry", handle.url()))
            .header("content-type", "application/json")
            .body(format!(r#"{{"n":{i}}}"#))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 204, "request {i}");
    }

    let resp = client
        .post(format!("{}/telemetry", handle.url()))
        .header("content-type", "application/json")
        .body(r#"{"n":10}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 429);

    handle.shutdown().await;

    // The rejected request produced no log line.
    let flat = std::fs::read_to_string(&config.telemetry_log.flat_file).unwrap();
    assert_eq!(flat.lines().count(), 10);
}

#[tokio::test]
async fn malformed_telemetry_body_is_client_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let handle = EdgeServer::start_test(&config).await.unwrap();
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/telemetry", handle.url()))
        .header("content-type", "application/json")
        .body("{definitely not json")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());

    handle.shutdown().await;

    let flat = std::fs::read_to_string(&config.telemetry_log.flat_file).unwrap();
    assert!(flat.is_empty());
}
