use std::sync::Arc;

use music_fleet::fleet::Fleet;
use music_fleet::status::{self, StatusState};
use serde_json::Value;
use tokio::sync::mpsc;

async fn spawn_server(identities: Vec<u8>, fleet: Arc<Fleet>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = StatusState {
        identities: Arc::new(identities),
        fleet,
    };
    tokio::spawn(status::serve(listener, state));
    format!("http://{addr}")
}

async fn get_json(url: &str) -> (reqwest::StatusCode, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_root_reports_bots() {
    let fleet = Arc::new(Fleet::new());
    let (tx, _rx) = mpsc::channel(1);
    fleet.register(2, tx).await;
    let base = spawn_server(vec![2, 5], Arc::clone(&fleet)).await;

    let (status, body) = get_json(&format!("{base}/")).await;
    assert!(status.is_success());
    assert_eq!(body["totalBots"], 16);
    assert_eq!(body["activeBots"], 2);
    assert_eq!(body["status"], "Running 24/7");
    assert!(body["message"].as_str().unwrap().contains("Music Bot"));
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));

    let bots = body["bots"].as_array().unwrap();
    assert_eq!(bots.len(), 2);
    assert_eq!(bots[0]["id"], 2);
    assert_eq!(bots[0]["status"], "Active");
    assert_eq!(bots[1]["id"], 5);
    assert_eq!(bots[1]["status"], "Offline");
}

#[tokio::test]
async fn test_health() {
    let base = spawn_server(vec![1], Arc::new(Fleet::new())).await;

    let (status, body) = get_json(&format!("{base}/health")).await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_bot_list() {
    let base = spawn_server(vec![1, 4, 16], Arc::new(Fleet::new())).await;

    let (status, body) = get_json(&format!("{base}/bots")).await;
    assert!(status.is_success());
    assert_eq!(body["totalBots"], 3);
    let ids: Vec<u64> = body["bots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 4, 16]);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let base = spawn_server(vec![1], Arc::new(Fleet::new())).await;

    let response = reqwest::get(format!("{base}/nope")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
