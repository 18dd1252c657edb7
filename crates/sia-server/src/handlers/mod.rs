pub mod chat;
pub mod health;
pub mod history;
pub mod index;
pub mod session;

use actix_web::HttpResponse;

pub(crate) fn session_not_found(session_id: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": format!("Session not found: {}", session_id)
    }))
}
