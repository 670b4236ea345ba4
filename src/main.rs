//! Entry point: starts the todo HTTP service on a local port.

use todo_api::{app, AppState, Config, TodoStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // RUST_LOG controls verbosity
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let store = TodoStore::connect(&config.database_url)
        .await
        .expect("failed to open database");

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind address");
    tracing::info!(%addr, db = %config.database_url, "server starting");

    let router = app(AppState { store }, &config.client_origin);
    axum::serve(listener, router).await.expect("server error");
}
