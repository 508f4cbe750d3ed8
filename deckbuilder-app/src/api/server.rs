use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use deckbuilder_core::{CardCatalog, DeckRepository, ImageStore};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::api::routes::{add_card, create_deck, delete_deck, get_deck, list_cards, list_decks, update_deck};

pub struct AppState {
    pub decks: Arc<dyn DeckRepository>,
    pub catalog: Arc<dyn CardCatalog>,
    pub images: Arc<dyn ImageStore>,
}

pub struct ServeOptions {
    /// Served as static files; uploads live in its `uploads/` subdirectory.
    pub public_dir: PathBuf,
    pub max_body_bytes: usize,
}

pub fn router(state: AppState, opts: &ServeOptions) -> Router {
    Router::new()
        .route("/api/cards", get(list_cards))
        .route("/api/decks", get(list_decks).post(create_deck))
        .route(
            "/api/decks/:id",
            get(get_deck).put(update_deck).delete(delete_deck),
        )
        .route("/api/decks/:id/cards", post(add_card))
        .with_state(Arc::new(state))
        .fallback_service(ServeDir::new(&opts.public_dir))
        .layer(DefaultBodyLimit::max(opts.max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn run(state: AppState, opts: ServeOptions, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(state, &opts);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, public_dir = %opts.public_dir.display(), "server listening");
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until killed.
        std::future::pending::<()>().await;
    }
}
