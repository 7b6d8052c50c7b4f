//! SiteProgress RS Server
//!
//! HTTP server binary: loads configuration, connects to PostgreSQL, runs
//! migrations, and serves the progress-tracking API with health probes.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sp_api::AppState;
use sp_core::config::AppConfig;
use sp_db::{Database, DatabaseConfig};

mod health;

use health::{HealthChecker, HealthConfig, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        AppConfig::default()
    });

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        "Starting SiteProgress RS"
    );

    let db_config = DatabaseConfig::from_settings(&config.database);
    let db = match Database::connect(&db_config).await {
        Ok(db) => {
            info!("Connected to database");
            db.migrate().await?;
            info!("Migrations applied");
            Some(db)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to connect to database: {}. Running without database.",
                e
            );
            None
        }
    };

    let mut health_checker = HealthChecker::new(HealthConfig::default());
    if let Some(ref db) = db {
        health_checker = health_checker.with_pool(db.pool().clone());
    }

    let server_state = Arc::new(ServerState {
        health: Arc::new(health_checker),
    });
    let api_state = match db {
        Some(ref db) => AppState::new(db.pool().clone()),
        None => AppState::without_database(),
    };

    let app = build_router(server_state, api_state);

    let addr = config.server_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = db {
        db.close().await;
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,sp_server=debug,sp_api=debug,tower_http=debug".into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Build the application router
fn build_router(server_state: Arc<ServerState>, api_state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::default_health_check))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/health/full", get(health::health))
        .with_state(server_state);

    let api_routes = sp_api::router().with_state(api_state);

    Router::new()
        .merge(health_routes)
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let server_state = Arc::new(ServerState {
            health: Arc::new(HealthChecker::new(HealthConfig::default())),
        });

        build_router(server_state, AppState::without_database())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_liveness_endpoint() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_without_database_is_ok() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_root() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
