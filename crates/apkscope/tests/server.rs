mod common;

use std::collections::HashMap;
use std::sync::Arc;

use apkscope::channel::MethodResponse;
use apkscope::server;
use serde_json::json;

use common::{Fixture, sample_package};

async fn exchange(fx: Fixture, requests: &[String]) -> Vec<MethodResponse> {
    let input = requests.join("\n");
    let output = server::serve(Arc::new(fx.inspector), input.as_bytes(), Vec::new())
        .await
        .unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn answers_every_request_by_id() {
    let fx = Fixture::new();
    let apk = fx.path("app.apk");
    sample_package(&apk);
    let file_path = apk.to_str().unwrap().to_string();

    let requests: Vec<String> = [
        json!({ "id": 1, "method": "getEndpoints", "arguments": { "filePath": file_path } }),
        json!({ "id": 2, "method": "getObfuscationAnalysis", "arguments": { "filePath": file_path } }),
        json!({ "id": 3, "method": "getPackageMetadata", "arguments": {} }),
        json!({ "id": 4, "method": "uninstall", "arguments": { "packageName": "a.b" } }),
        json!({ "id": 5, "method": "extractPackage", "arguments": { "packageName": "com.none" } }),
    ]
    .iter()
    .map(|request| request.to_string())
    .collect();

    let responses = exchange(fx, &requests).await;
    assert_eq!(responses.len(), 5);
    let by_id: HashMap<u64, MethodResponse> = responses
        .into_iter()
        .map(|response| (response.id.unwrap(), response))
        .collect();

    assert_eq!(
        by_id[&1].result().unwrap(),
        &json!(["http://example.com/path", "https://cdn.example.net/img.png"])
    );
    assert_eq!(by_id[&2].result().unwrap()["isObfuscated"], true);
    assert_eq!(by_id[&3].error().unwrap().code, "INVALID_ARGUMENT");
    assert_eq!(by_id[&4].error().unwrap().code, "NOT_IMPLEMENTED");
    assert_eq!(by_id[&5].error().unwrap().code, "NOT_FOUND");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn malformed_lines_get_a_null_id_error() {
    let fx = Fixture::new();
    let requests = vec![
        "{not json".to_string(),
        String::new(),
        json!({ "id": 9, "method": "getApkUrls", "arguments": { "filePath": "/nonexistent/x.apk" } })
            .to_string(),
    ];

    let responses = exchange(fx, &requests).await;
    assert_eq!(responses.len(), 2);

    let malformed = responses.iter().find(|r| r.id.is_none()).unwrap();
    assert_eq!(malformed.error().unwrap().code, "INVALID_ARGUMENT");

    let degraded = responses.iter().find(|r| r.id == Some(9)).unwrap();
    assert_eq!(degraded.result().unwrap(), &json!([]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn empty_input_writes_nothing() {
    let responses = exchange(Fixture::new(), &[]).await;
    assert!(responses.is_empty());
}
