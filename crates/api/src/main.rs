use std::net::SocketAddr;
use std::sync::Arc;

use chapterhouse_api::config::{ServerConfig, StoreBackend};
use chapterhouse_api::router::build_app_router;
use chapterhouse_api::services::bootstrap::ensure_super_admin_invitation;
use chapterhouse_api::services::credentials::{
    CredentialRegistry, HttpCredentialRegistry, StaticCredentialRegistry,
};
use chapterhouse_api::state::AppState;
use chapterhouse_db::store::{DirectoryStore, MemoryDirectoryStore, PgDirectoryStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chapterhouse_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        store = ?config.store_backend,
        "Loaded server configuration",
    );

    // --- Store ---
    let store: Arc<dyn DirectoryStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set");

            let pool = chapterhouse_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            chapterhouse_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            chapterhouse_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgDirectoryStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            Arc::new(MemoryDirectoryStore::new())
        }
    };

    // --- Credential lookups ---
    let credentials: Arc<dyn CredentialRegistry> = match &config.credential_lookup_url {
        Some(url) => Arc::new(
            HttpCredentialRegistry::new(url.clone())
                .expect("Failed to build credential lookup HTTP client"),
        ),
        None => {
            tracing::warn!("CREDENTIAL_LOOKUP_URL not set; skipping credential checks on issuance");
            Arc::new(StaticCredentialRegistry::default())
        }
    };

    // --- Bootstrap ---
    if let Some(email) = &config.bootstrap_super_admin_email {
        match ensure_super_admin_invitation(store.as_ref(), email).await {
            Ok(Some(invitation)) => tracing::info!(
                email = %invitation.email,
                code = %invitation.code,
                "Redeem this code to create the first super admin",
            ),
            Ok(None) => {}
            Err(e) => panic!("Failed to bootstrap super admin invitation: {e}"),
        }
    }

    // --- App state ---
    let state = AppState {
        store,
        credentials,
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
