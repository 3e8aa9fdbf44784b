//! Process wiring: builds adapters from configuration and serves the API.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;

use crate::adapters::directory::{WorkspaceDirectoryConfig, WorkspaceDirectoryProvisioner};
use crate::adapters::http::{api_router, with_http_layers, AppState};
use crate::adapters::identity::{OAuthIdentityProvider, OAuthProviderConfig};
use crate::adapters::postgres::PostgresRegistrationStore;
use crate::config::{AppConfig, ValidationError};

/// Startup and serve failures.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Connects to the database and applies pending migrations if configured.
pub async fn connect_database(config: &AppConfig) -> Result<PgPool, ServerError> {
    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(pool)
}

/// Builds the production adapters and handler state.
pub fn build_state(config: &AppConfig, pool: PgPool) -> Result<AppState, ServerError> {
    let identity = &config.identity;
    let identity_provider = OAuthIdentityProvider::new(
        OAuthProviderConfig::new(
            identity.client_id.clone(),
            identity.client_secret.clone(),
            identity.token_url.clone(),
            identity.userinfo_url.clone(),
        )
        .with_timeout(identity.timeout()),
    )?;

    let directory = &config.directory;
    let directory_provisioner = WorkspaceDirectoryProvisioner::new(
        WorkspaceDirectoryConfig::new(
            directory.client_id.clone(),
            directory.client_secret.clone(),
            directory.refresh_token.clone(),
        )
        .with_endpoints(directory.token_url.clone(), directory.users_url.clone())
        .with_timeout(directory.timeout()),
    )?;

    Ok(AppState {
        identity_provider: Arc::new(identity_provider),
        directory: Arc::new(directory_provisioner),
        store: Arc::new(PostgresRegistrationStore::new(pool)),
        policy: config.registration.input_policy(),
        min_trust_tier: config.registration.min_trust_tier(),
        redirect_uri: identity.redirect_uri.clone(),
    })
}

/// Runs the service until Ctrl-C or SIGTERM.
pub async fn run(config: AppConfig) -> Result<(), ServerError> {
    let addr = config.server.socket_addr()?;

    let pool = connect_database(&config).await?;
    let state = build_state(&config, pool)?;
    let app = with_http_layers(api_router(state), &config.server);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        institutional_domain = %config.registration.institutional_domain,
        min_trust_tier = config.registration.min_trust_tier,
        "Registration portal listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
