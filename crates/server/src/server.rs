use axum::{Router, routing::get};

use crate::recipes;
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Engine,
}

/// Build the application router with every route mounted under `prefix`.
///
/// An empty prefix (or `/`) mounts the routes at the root.
pub fn router(engine: Engine, prefix: &str) -> Router {
    let state = ServerState { engine };

    let routes = Router::new()
        .route("/recipes", get(recipes::list).post(recipes::create))
        .route("/recipes/", get(recipes::list).post(recipes::create))
        .route(
            "/recipes/{id}",
            get(recipes::get)
                .patch(recipes::update)
                .delete(recipes::delete),
        )
        .with_state(state);

    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(&format!("/{prefix}"), routes)
    }
}

pub async fn run_with_listener(
    engine: Engine,
    prefix: &str,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine, prefix)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    prefix: String,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, &prefix, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
