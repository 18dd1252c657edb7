use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sia_core::{ConversationOutcome, Resolution, Session, Ticket, Topic, Turn};

use crate::handlers::session_not_found;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionSnapshot<'a> {
    pub session_id: &'a str,
    pub stage: &'static str,
    pub topic: Option<Topic>,
    pub outcome: ConversationOutcome,
    pub attempts: u32,
    pub last_resolution: Option<&'a Resolution>,
    pub tickets: &'a [Ticket],
    pub turn_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> SessionSnapshot<'a> {
    fn of(session: &'a Session) -> Self {
        Self {
            session_id: &session.id,
            stage: session.stage().name(),
            topic: session.topic(),
            outcome: session.outcome(),
            attempts: session.attempts(),
            last_resolution: session.last_resolution(),
            tickets: session.tickets().tickets(),
            turn_count: session.transcript().len(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct RestartResponse<'a> {
    session_id: &'a str,
    stage: &'static str,
    turns: &'a [Turn],
}

pub async fn get_session(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let session_id = path.into_inner();
    match state.session(&session_id).await {
        Some(session) => HttpResponse::Ok().json(SessionSnapshot::of(&session)),
        None => session_not_found(&session_id),
    }
}

pub async fn restart_session(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let session_id = path.into_inner();
    let Some(handle) = state.session_handle(&session_id).await else {
        return session_not_found(&session_id);
    };

    let mut session = handle.lock().await;
    state.loop_config.assistant.restart(&mut session);
    HttpResponse::Ok().json(RestartResponse {
        session_id: &session.id,
        stage: session.stage().name(),
        turns: session.transcript(),
    })
}

pub async fn delete_session(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let session_id = path.into_inner();
    if state.remove(&session_id).await {
        log::info!("[{}] Session deleted", session_id);
        HttpResponse::Ok().json(serde_json::json!({ "deleted": session_id }))
    } else {
        session_not_found(&session_id)
    }
}
