#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use crate::api::{MgmtState, ServiceContainer};
use crate::config::Config;
use crate::services::health_service::HealthService;
use crate::services::message_service::MessageService;
use crate::storage::{InMemoryMessageRepository, MessageRepository, PgMessageRepository};
use std::sync::Arc;
use tokio::sync::watch;

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod storage;
pub mod telemetry;

#[derive(Debug)]
pub struct App {
    pub services: ServiceContainer,
    pub mgmt: MgmtState,
}

/// Wires the repository into the services.
#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    repo: Option<Arc<dyn MessageRepository>>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, repo: None }
    }

    #[must_use]
    pub fn with_repository(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.repo = Some(repo);
        self
    }

    /// Builds the services. Without an explicit repository, connects to the
    /// configured database or falls back to an in-memory store.
    ///
    /// # Errors
    /// Returns an error if the database cannot be reached or migrated.
    pub async fn build(self) -> anyhow::Result<App> {
        let repo = match self.repo {
            Some(repo) => repo,
            None => connect_repository(&self.config).await?,
        };

        Ok(App {
            services: ServiceContainer { message_service: MessageService::new(Arc::clone(&repo)) },
            mgmt: MgmtState { health_service: HealthService::new(repo, self.config.health) },
        })
    }
}

async fn connect_repository(config: &Config) -> anyhow::Result<Arc<dyn MessageRepository>> {
    if let Some(database_url) = &config.database_url {
        let pool = storage::init_pool(database_url, config.database.max_connections).await?;
        storage::run_migrations(&pool).await?;
        tracing::info!("Using Postgres message store");
        Ok(Arc::new(PgMessageRepository::new(pool)))
    } else {
        tracing::warn!("No database configured, messages are kept in memory and lost on restart");
        Ok(Arc::new(InMemoryMessageRepository::new()))
    }
}

/// Routes panics through `tracing` so they reach the configured log sink.
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info.location().map(ToString::to_string).unwrap_or_default();
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_default();
        tracing::error!(panic.location = %location, panic.payload = %payload, "Panic occurred");
    }));
}

/// Flips the shutdown channel on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to listen for SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
            () = terminate => tracing::info!("Received SIGTERM, shutting down"),
        }

        let _ = shutdown_tx.send(true);
    });
}
