use axum::http::HeaderValue;
use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::db::TodoStore;
use crate::handlers;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: TodoStore,
}

/// Builds the service router. Every response carries CORS headers for the
/// configured client origin.
pub fn app(state: AppState, client_origin: &str) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todos/:id",
            put(handlers::update_todo).delete(handlers::delete_todo),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors(client_origin))
        .with_state(state)
}

/// One allowed browser origin. Methods and headers are mirrored rather than
/// wildcarded: credentialed CORS forbids `*`.
fn cors(client_origin: &str) -> CorsLayer {
    let origin = client_origin
        .parse::<HeaderValue>()
        .expect("invalid client origin");

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
