//! Enrollment service
//!
//! REST API for the course catalog, registration/login by natural key,
//! enrollment recording and the administrator panel.

use std::sync::Arc;

use anyhow::{Context, Result};
use enrollment_service::{
    create_router, sync, Accounts, AdminPanel, AppState, CatalogStore, Config,
    EnrollmentRecorder, HttpRemote, MemoryRemote, RemoteStore,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_directory::{Directory, KeyValue, MemoryKv, RedisKv, SessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "enrollment_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Starting enrollment service");
    info!("Mock mode: {}", config.mock_mode);

    // Backends: fully in-memory in mock mode, Redis + document API otherwise.
    let kv: Arc<dyn KeyValue> = if config.mock_mode {
        Arc::new(MemoryKv::new())
    } else {
        info!("Redis URL: {}", config.redis_url);
        Arc::new(
            RedisKv::connect(&config.redis_url)
                .await
                .context("Failed to initialize local store")?,
        )
    };

    let remote: Arc<dyn RemoteStore> = if config.mock_mode {
        Arc::new(MemoryRemote::new())
    } else {
        let remote_url = config
            .remote_url
            .clone()
            .context("REMOTE_STORE_URL is required when MOCK_MODE=false")?;
        info!("Remote store URL: {}", remote_url);
        Arc::new(HttpRemote::new(remote_url))
    };

    let directory = Directory::new(kv.clone());
    let session = SessionStore::new(kv);
    let sync_handle = sync::spawn(remote.clone(), config.sync_queue_capacity);

    let state = AppState {
        catalog: CatalogStore::new(remote.clone()),
        accounts: Accounts::new(
            directory.clone(),
            session.clone(),
            remote.clone(),
            sync_handle.clone(),
        ),
        recorder: EnrollmentRecorder::new(directory.clone(), session.clone(), sync_handle),
        admin: AdminPanel::new(directory, session, remote),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.api_host, config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("Enrollment service running on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
