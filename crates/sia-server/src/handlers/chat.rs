use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use sia_core::{ConversationOutcome, Status, Ticket};
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub reply: String,
    pub outcome: ConversationOutcome,
    pub stage: &'static str,
    pub status: Option<Status>,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<Ticket>,
}

pub async fn handler(state: web::Data<AppState>, req: web::Json<ChatRequest>) -> impl Responder {
    let message = req.message.trim();
    if message.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "message must not be empty"
        }));
    }

    let session_id = req
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    state.evict_idle().await;
    let handle = state.session_handle_or_new(&session_id).await;
    let mut session = handle.lock().await;

    let config = &state.loop_config;
    sia_loop::open_session(config, &mut session);
    let topic = sia_loop::route_topic(config, &session, message).await;

    // Lookups may sleep between attempts, so the turn runs off the worker thread.
    let assistant = config.assistant.clone();
    let mut working = session.clone();
    let text = message.to_string();
    let turn = web::block(move || {
        let report = assistant.handle_turn(&mut working, &text, topic);
        (working, report)
    })
    .await;

    let report = match turn {
        Ok((updated, report)) => {
            *session = updated;
            report
        }
        Err(e) => {
            log::error!("[{}] Turn failed to run: {}", session_id, e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to process message"
            }));
        }
    };
    drop(session);
    state.reattach(&session_id, &handle).await;

    HttpResponse::Ok().json(ChatResponse {
        session_id,
        reply: report.reply,
        outcome: report.outcome,
        stage: report.stage.name(),
        status: report.status,
        attempts: report.attempts,
        ticket: report.ticket,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_session_id_is_optional() {
        let req: ChatRequest = serde_json::from_str(r#"{"message": "1001"}"#).unwrap();
        assert_eq!(req.message, "1001");
        assert!(req.session_id.is_none());
    }

    #[test]
    fn chat_response_omits_missing_ticket() {
        let response = ChatResponse {
            session_id: "s1".to_string(),
            reply: "hi".to_string(),
            outcome: ConversationOutcome::Continue,
            stage: "collect-user-id",
            status: None,
            attempts: 0,
            ticket: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("ticket").is_none());
        assert_eq!(json["outcome"], "continue");
        assert!(json["status"].is_null());
    }
}
