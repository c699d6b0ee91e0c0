use std::net::{Ipv6Addr, SocketAddr};

use axum::routing::get;
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use velvet_core::Config;

mod auth;
mod clubs;
mod context;
mod docs;
mod errors;
mod events;
mod logging;
mod schemas;
mod serialized;
mod uploads;

pub use context::*;
pub use logging::init_logger;

pub type Router = axum::Router<ServerContext>;

/// Starts the velvet server
pub async fn run_server(config: &Config, context: ServerContext) {
    let addr: SocketAddr = (Ipv6Addr::UNSPECIFIED, config.port).into();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let root_router = Router::new()
        .nest("/auth", auth::router())
        .nest("/clubs", clubs::router())
        .nest("/events", events::router())
        .nest("/upload", uploads::router())
        .route("/api.json", get(docs::docs))
        .layer(cors)
        .with_state(context);

    let listener = TcpListener::bind(&addr).await.expect("listens on address");

    info!("Listening on port {}", config.port);

    axum::serve(listener, root_router.into_make_service())
        .await
        .expect("server runs");
}
