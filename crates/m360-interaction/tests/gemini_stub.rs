use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use m360_core::chat::MessageType;
use m360_core::config::{AppConfig, ChatSettings, ConnectivitySettings, GeminiSettings};
use m360_interaction::{
    ChatService, ConnectivityChecker, ConnectivityStatus, GeminiApiAgent, GenerativeBackend,
    GenerativeError, Responder,
};
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<(String, String, Value)>>>,
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Gemini stand-in answering every request with `reply` as candidate text.
async fn spawn_gemini(reply: &'static str, status: StatusCode) -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route(
            "/models/{call}",
            post(
                move |State(recorded): State<Recorded>,
                      Path(call): Path<String>,
                      Query(query): Query<HashMap<String, String>>,
                      Json(body): Json<Value>| async move {
                    let key = query.get("key").cloned().unwrap_or_default();
                    recorded.requests.lock().unwrap().push((call, key, body));
                    if status.is_success() {
                        (
                            status,
                            Json(json!({"candidates":[{"content":{"parts":[{"text": reply}]}}]})),
                        )
                    } else {
                        (
                            status,
                            Json(json!({"error":{"code": status.as_u16(),"message": reply,"status":"UNAVAILABLE"}})),
                        )
                    }
                },
            ),
        )
        .with_state(recorded.clone());
    let addr = spawn(app).await;
    (format!("http://{addr}/models"), recorded)
}

#[tokio::test]
async fn test_agent_sends_three_turns_with_key() {
    let (base, recorded) = spawn_gemini(r#"{"type":"text","text":"Tashi delek"}"#, StatusCode::OK).await;
    let agent = GeminiApiAgent::new("secret", "gemini-1.5-flash").with_base_url(&base);

    let raw = agent.generate("Hello", &[]).await.unwrap();
    assert_eq!(raw, r#"{"type":"text","text":"Tashi delek"}"#);

    let requests = recorded.requests.lock().unwrap();
    let (call, key, body) = &requests[0];
    assert_eq!(call, "gemini-1.5-flash:generateContent");
    assert_eq!(key, "secret");
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert!(contents.iter().all(|c| c["role"] == "user"));
    assert_eq!(contents[2]["parts"][0]["text"], "Now reply to: Hello\nReturn ONLY JSON.");
}

#[tokio::test]
async fn test_agent_maps_http_errors() {
    let (base, _) = spawn_gemini("overloaded", StatusCode::SERVICE_UNAVAILABLE).await;
    let agent = GeminiApiAgent::new("secret", "gemini-1.5-flash").with_base_url(&base);

    let err = agent.generate("Hello", &[]).await.unwrap_err();
    assert!(matches!(
        err,
        GenerativeError::Http { status: 503, ref message } if message == "UNAVAILABLE: overloaded"
    ));
}

#[tokio::test]
async fn test_config_wired_responder_uses_remote_reply() {
    let (base, _) = spawn_gemini(
        "Here you go:\n```json\n{\"type\":\"itinerary\",\"text\":\"Day 1\",\"metadata\":null}\n```",
        StatusCode::OK,
    )
    .await;
    let config = AppConfig {
        gemini: Some(GeminiSettings {
            api_key: "secret".into(),
            model: "gemini-1.5-flash".into(),
            base_url: Some(base),
        }),
        chat: ChatSettings::instant(),
        ..AppConfig::default()
    };

    let service = ChatService::new(Responder::from_config(&config));
    let reply = service.send("plan my trip").await.unwrap();
    assert_eq!(reply.kind, MessageType::Itinerary);
    assert_eq!(reply.text, "Day 1");
    assert_eq!(reply.metadata_str("source"), Some("gemini"));
}

#[tokio::test]
async fn test_remote_failure_degrades_to_rules() {
    let (base, _) = spawn_gemini("boom", StatusCode::INTERNAL_SERVER_ERROR).await;
    let responder = Responder::new()
        .with_chat_settings(ChatSettings::instant())
        .with_backend(Arc::new(
            GeminiApiAgent::new("secret", "gemini-1.5-flash").with_base_url(&base),
        ));

    let reply = responder.respond("Hotels near Tawang?", &[]).await;
    assert_eq!(reply.kind, MessageType::Hotel);
    assert_eq!(reply.source(), Some("rules"));
}

#[tokio::test]
async fn test_connectivity_monitor_stops_after_success() {
    let app = Router::new().route("/api/monasteries", get(|| async { Json(json!([])) }));
    let addr = spawn(app).await;

    let checker = ConnectivityChecker::new(&ConnectivitySettings {
        api_base_url: format!("http://{addr}"),
        timeout_secs: 5,
        retry_secs: 30,
    })
    .unwrap();
    let (mut rx, handle) = checker.spawn_monitor();

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(*rx.borrow_and_update(), ConnectivityStatus::Ok);
}

#[tokio::test]
async fn test_connectivity_monitor_retries_failures() {
    let app = Router::new().route(
        "/api/monasteries",
        get(|| async { (StatusCode::BAD_GATEWAY, "down") }),
    );
    let addr = spawn(app).await;

    let checker = ConnectivityChecker::new(&ConnectivitySettings {
        api_base_url: format!("http://{addr}"),
        timeout_secs: 5,
        retry_secs: 30,
    })
    .unwrap()
    .with_retry(Duration::from_millis(20));
    let (mut rx, handle) = checker.spawn_monitor();

    rx.changed().await.unwrap();
    assert_eq!(
        *rx.borrow_and_update(),
        ConnectivityStatus::Error("API responded with status: 502".into())
    );
    // Still retrying.
    rx.changed().await.unwrap();
    handle.abort();
}
