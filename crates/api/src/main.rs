use std::net::SocketAddr;
use std::sync::Arc;

use gacha_core::store::memory::MemoryStore;
use gacha_core::store::Stores;
use gacha_engine::seed::seed_catalog;
use gacha_engine::{GachaEngine, GameTuning};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gacha_api::config::ServerConfig;
use gacha_api::router::build_app_router;
use gacha_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gacha_api=debug,gacha_engine=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let tuning = GameTuning::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        duplicate_policy = %tuning.duplicate_policy,
        "Loaded server configuration",
    );

    // --- Storage ---
    let (stores, pool) = match &config.database_url {
        Some(database_url) => {
            let pool = gacha_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            gacha_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            gacha_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            let backend = Arc::new(gacha_db::PgStore::new(pool.clone()));
            (Stores::from_backend(backend), Some(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, all state is kept in memory");
            let (_, stores) = MemoryStore::stores();
            (stores, None)
        }
    };

    let engine = Arc::new(GachaEngine::new(stores, tuning));

    // --- Seeding ---
    if config.seed_catalog {
        let report = seed_catalog(&engine)
            .await
            .expect("Failed to seed the catalog");
        tracing::info!(
            characters = report.characters,
            shop_items = report.shop_items,
            "Catalog seeded",
        );
    }

    // --- App state ---
    let state = AppState {
        engine,
        pool: pool.clone(),
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

    tracing::info!("Server stopped accepting connections, cleaning up");
    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
