use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use sia_core::Turn;

use crate::handlers::session_not_found;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HistoryResponse<'a> {
    pub session_id: &'a str,
    pub turns: &'a [Turn],
}

pub async fn handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let session_id = path.into_inner();
    match state.session(&session_id).await {
        Some(session) => HttpResponse::Ok().json(HistoryResponse {
            session_id: &session.id,
            turns: session.transcript(),
        }),
        None => session_not_found(&session_id),
    }
}
