use std::net::SocketAddr;
use std::sync::Arc;

use blog_common::storage::s3::S3ObjectStore;
use tracing::{Level, info};

use blog_server::config::AppConfig;
use blog_server::database;
use blog_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = database::init_db(&config.database.url).await?;
    let store = Arc::new(S3ObjectStore::new(&config.storage)?);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState { db, store, config };
    let app = blog_server::build_router(state);

    info!("Server running at http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
