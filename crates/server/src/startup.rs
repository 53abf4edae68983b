use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::validation::MessageCatalog;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use models::ConversionRegistry;
use service::users::{repo::SeaOrmUserRepository, UserService};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

/// Message catalog from the `[validation]` section.
pub fn build_catalog(cfg: &AppConfig) -> Result<MessageCatalog, StartupError> {
    MessageCatalog::from_config(&cfg.validation.language, &cfg.validation.messages)
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

/// Connect, migrate and wire the application state.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let catalog = build_catalog(cfg)?;

    // DB connection
    let db = models::db::connect_with_config(&cfg.database).await?;
    models::db::test_connection(&db)
        .await
        .map_err(|e| StartupError::Runtime(format!("database not reachable: {e}")))?;

    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Runtime(format!("migrations failed: {e}")))?;
        info!(event = "migrations_applied", "database schema up to date");
    }

    // Conversions are registered once here and only read afterwards.
    let conversions = Arc::new(ConversionRegistry::with_value_objects());
    let repo = Arc::new(SeaOrmUserRepository::new(db, conversions));
    Ok(AppState::new(UserService::new(repo), catalog))
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Cancels `shutdown` on Ctrl+C.
fn cancel_on_ctrl_c(shutdown: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!(event = "shutdown_signal", "received Ctrl+C, draining requests");
                shutdown.cancel();
            }
            Err(e) => warn!(event = "signal_listener_failed", error = %e, "Ctrl+C handler unavailable"),
        }
    });
}

/// Public entry: build the app and serve until Ctrl+C.
///
/// Shutdown cancels validation still in flight and stops accepting
/// connections; requests already past the gate run to completion.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let shutdown = CancellationToken::new();
    let state = build_state(&cfg).await?.with_shutdown(shutdown.clone());
    let app: Router = routes::build_router(state)?;

    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, event = "listening", "user api accepting connections");

    cancel_on_ctrl_c(shutdown.clone());
    axum::serve(listener, app).with_graceful_shutdown(shutdown.cancelled_owned()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn catalog_follows_config_overrides() {
        let mut cfg = AppConfig::default();
        cfg.validation.messages = HashMap::from([("EmailValidator".to_string(), "Bad email.".to_string())]);
        let catalog = build_catalog(&cfg).unwrap();
        assert_eq!(catalog.template(common::validation::RuleCode::EmailAddress), "Bad email.");
    }

    #[test]
    fn unknown_language_is_a_config_error() {
        let mut cfg = AppConfig::default();
        cfg.validation.language = "xx".into();
        assert!(matches!(build_catalog(&cfg), Err(StartupError::InvalidConfig(_))));
    }

    #[test]
    fn bind_addr_uses_server_section() {
        let cfg = AppConfig::default();
        assert_eq!(bind_addr(&cfg).unwrap().to_string(), "127.0.0.1:8080");
    }
}
