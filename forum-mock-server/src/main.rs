use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use forum_mock_server::{router, MockServer};
use tokio::sync::Mutex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let port = std::env::var("PORT").context("PORT must be set")?;
    let port = port
        .parse::<u16>()
        .with_context(|| format!("parsing PORT {port:?}"))?;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let server = Arc::new(Mutex::new(MockServer::new()));
    tracing::info!("listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(router(server).into_make_service())
        .await
        .context("serving axum webserver")
}
