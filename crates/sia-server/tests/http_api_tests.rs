//! HTTP API tests for the SIA server routes

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use sia_core::{prompts, SleepWait, SupportAssistant};
use sia_llm::Completer;
use sia_loop::SupportLoopConfig;
use sia_server::{app_config, AppState};

/// Routes everything to listings after a short delay.
struct SlowCompleter;

#[async_trait]
impl Completer for SlowCompleter {
    async fn complete(&self, _prompt: &str) -> sia_llm::Result<String> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok("listing".to_string())
    }
}

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::default()))
                .configure(app_config),
        )
        .await
    };
}

macro_rules! test_app_with {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(app_config),
        )
        .await
    };
}

macro_rules! post_chat {
    ($app:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/chat")
            .set_json($body)
            .to_request();
        test::call_service(&$app, req).await
    }};
}

#[actix_web::test]
async fn test_health_endpoint() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "status": "ok" }));
}

#[actix_web::test]
async fn test_index_serves_chat_page() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("/api/v1/chat"));
}

#[actix_web::test]
async fn test_empty_message_is_rejected() {
    let app = test_app!();

    let resp = post_chat!(app, json!({ "message": "   " }));
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn test_active_user_advances_to_listing_stage() {
    let app = test_app!();

    let resp = post_chat!(app, json!({ "message": "1001" }));
    assert!(resp.status().is_success());
    let body: Value = test::read_body_json(resp).await;

    assert!(body["session_id"].is_string());
    assert_eq!(body["status"], "active");
    assert_eq!(body["outcome"], "continue");
    assert_eq!(body["stage"], "collect-listing-or-brand-id");
    assert_eq!(body["attempts"], 1);
}

#[actix_web::test]
async fn test_blocked_listing_creates_ticket() {
    let app = test_app!();

    let resp = post_chat!(app, json!({ "message": "1001", "session_id": "seller-1" }));
    assert!(resp.status().is_success());

    let resp = post_chat!(app, json!({ "message": "listing 1002", "session_id": "seller-1" }));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "blocked");
    assert_eq!(body["outcome"], "escalate-to-ticket");
    assert_eq!(body["ticket"]["id"], "TICKET12345");

    let req = test::TestRequest::get()
        .uri("/api/v1/sessions/seller-1")
        .to_request();
    let snapshot: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(snapshot["stage"], "resolved");
    assert_eq!(snapshot["tickets"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn test_unreachable_user_goes_on_hold_after_three_attempts() {
    let app = test_app!();

    let resp = post_chat!(app, json!({ "message": "5005" }));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "on-hold");
    assert_eq!(body["attempts"], 3);
    assert_eq!(body["outcome"], "terminate");
}

#[actix_web::test]
async fn test_history_returns_greeting_and_turns() {
    let app = test_app!();

    post_chat!(app, json!({ "message": "2002", "session_id": "seller-2" }));

    let req = test::TestRequest::get()
        .uri("/api/v1/history/seller-2")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let turns = body["turns"].as_array().unwrap();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[0]["speaker"], "assistant");
    assert_eq!(turns[1]["text"], "2002");
}

#[actix_web::test]
async fn test_unknown_session_is_not_found() {
    let app = test_app!();

    for (method, uri) in [
        ("GET", "/api/v1/history/missing"),
        ("GET", "/api/v1/sessions/missing"),
        ("POST", "/api/v1/sessions/missing/restart"),
        ("DELETE", "/api/v1/sessions/missing"),
    ] {
        let req = match method {
            "GET" => test::TestRequest::get(),
            "POST" => test::TestRequest::post(),
            _ => test::TestRequest::delete(),
        }
        .uri(uri)
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 404, "{method} {uri}");
    }
}

#[actix_web::test]
async fn test_restart_clears_transcript() {
    let app = test_app!();

    post_chat!(app, json!({ "message": "1001", "session_id": "seller-3" }));
    post_chat!(app, json!({ "message": "1004", "session_id": "seller-3" }));

    let req = test::TestRequest::post()
        .uri("/api/v1/sessions/seller-3/restart")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["stage"], "collect-user-id");
    assert_eq!(body["turns"].as_array().map(Vec::len), Some(1));

    let resp = post_chat!(app, json!({ "message": "1001", "session_id": "seller-3" }));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["outcome"], "continue");
}

#[actix_web::test]
async fn test_delete_removes_session() {
    let app = test_app!();

    post_chat!(app, json!({ "message": "1001", "session_id": "seller-4" }));

    let req = test::TestRequest::delete()
        .uri("/api/v1/sessions/seller-4")
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = test::TestRequest::get()
        .uri("/api/v1/sessions/seller-4")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);
}

#[actix_web::test]
async fn test_concurrent_turns_on_one_session_run_in_order() {
    let config = SupportLoopConfig::default().with_completer(Some(Arc::new(SlowCompleter)));
    let app = test_app_with!(AppState::new(config));

    post_chat!(app, json!({ "message": "1001", "session_id": "s" }));

    let first = test::TestRequest::post()
        .uri("/api/v1/chat")
        .set_json(json!({ "message": "1002", "session_id": "s" }))
        .to_request();
    let second = test::TestRequest::post()
        .uri("/api/v1/chat")
        .set_json(json!({ "message": "1003", "session_id": "s" }))
        .to_request();
    let (a, b) = tokio::join!(
        test::call_service(&app, first),
        test::call_service(&app, second)
    );
    let a: Value = test::read_body_json(a).await;
    let b: Value = test::read_body_json(b).await;

    let (resolved, ended) = if a["status"].is_null() { (b, a) } else { (a, b) };
    assert!(!resolved["status"].is_null());
    assert!(ended["status"].is_null());
    assert_eq!(ended["reply"], prompts::CONVERSATION_ENDED);

    let req = test::TestRequest::get().uri("/api/v1/sessions/s").to_request();
    let snapshot: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(snapshot["turn_count"], 7);
    assert!(snapshot["tickets"].as_array().map_or(0, Vec::len) <= 1);
}

#[actix_web::test]
async fn test_retry_waits_do_not_stall_other_requests() {
    let assistant = SupportAssistant::new().with_wait(Arc::new(SleepWait::from_millis(150)));
    let app = test_app_with!(AppState::new(SupportLoopConfig::new(assistant)));

    let started = Instant::now();
    let chat = async {
        let resp = post_chat!(app, json!({ "message": "5005" }));
        let body: Value = test::read_body_json(resp).await;
        (body, started.elapsed())
    };
    let health = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        started.elapsed()
    };
    let ((body, chat_elapsed), health_elapsed) = tokio::join!(chat, health);

    assert_eq!(body["status"], "on-hold");
    assert!(chat_elapsed >= Duration::from_millis(300));
    assert!(health_elapsed < Duration::from_millis(150), "{health_elapsed:?}");
}
