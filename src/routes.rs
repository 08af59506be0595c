use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{delete_document, download_document, health_check, list_documents, upload_document},
    portal::portal_page,
    state::AppState,
};

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    // The handler enforces the real file limit; the body limit only needs to let it get there
    let upload_limit = state.config.max_file_size as usize + MULTIPART_OVERHEAD;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(portal_page))
        .route("/health", get(health_check))
        .route(
            "/documents/upload",
            post(upload_document).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/documents", get(list_documents))
        .route("/documents/{id}", get(download_document).delete(delete_document))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
