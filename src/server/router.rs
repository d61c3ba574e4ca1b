use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{delete, get, post},
};

use super::{auth, folders, mistakes, records};
use crate::media::AudioStore;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub media: AudioStore,
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        // Accounts & sessions
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/settings/profile", post(auth::update_profile))
        .route("/api/settings/password", post(auth::change_password))
        // Folders
        .route("/api/folders", get(folders::list_folders))
        .route("/api/folders", post(folders::create_folder))
        .route("/api/folders/init", post(folders::init_folders))
        .route("/api/folders/{id}", post(folders::rename_folder))
        .route("/api/folders/{id}", delete(folders::delete_folder))
        .route("/api/folders/{id}/records", get(folders::list_folder_records))
        // Records
        .route("/api/records", post(records::create_record))
        .route("/api/records/{id}", get(records::get_record))
        .route("/api/records/{id}/rename", post(records::rename_record))
        .route("/api/records/{id}/trash", post(records::trash_record))
        .route("/api/records/{id}/delete", delete(records::delete_record))
        // Mistakes
        .route("/api/records/{id}/errors", post(mistakes::add_error))
        .route(
            "/api/records/{id}/errors/comment",
            post(mistakes::update_error_comment),
        )
        .route("/api/mistakes/{id}", delete(mistakes::delete_mistake))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
