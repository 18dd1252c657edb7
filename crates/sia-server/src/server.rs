use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use sia_core::Config;
use std::io;

use crate::handlers;
use crate::state::AppState;

pub async fn run_server_with_config(port: u16, config: &Config) -> io::Result<()> {
    run_server_with_state(port, AppState::from_config(config)).await
}

pub async fn run_server_with_state(port: u16, state: AppState) -> io::Result<()> {
    let state = web::Data::new(state);
    log::info!("Listening on http://0.0.0.0:{}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await
}

/// Routes shared by the server and the HTTP tests.
pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index::handler)).service(
        web::scope("/api/v1")
            .route("/chat", web::post().to(handlers::chat::handler))
            .route(
                "/history/{session_id}",
                web::get().to(handlers::history::handler),
            )
            .route(
                "/sessions/{session_id}",
                web::get().to(handlers::session::get_session),
            )
            .route(
                "/sessions/{session_id}/restart",
                web::post().to(handlers::session::restart_session),
            )
            .route(
                "/sessions/{session_id}",
                web::delete().to(handlers::session::delete_session),
            )
            .route("/health", web::get().to(handlers::health::handler)),
    );
}
