//! Public library interface for the habit tracker API server
//!
//! This module exports the server wiring and the public types, so the
//! binary and the integration tests can both drive the application.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use thiserror::Error;

// Internal modules
mod api;
mod config;
mod domain;
mod service;
mod storage;

// Re-export public modules and types
pub use api::AppState;
pub use config::{build_repository, AppConfig, ConfigError, StorageMode};
pub use domain::*;
pub use service::{HabitService, HabitWithHistory, HistoryPage, ServiceError};
pub use storage::{
    FileHabitRepository, HabitIdName, HabitPage, HabitPatch, HabitRepository,
    InMemoryHabitRepository, NewHabit, StorageError,
};

/// Errors that can occur during server startup and operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The habit tracker API server
///
/// Wires configuration to a repository backend, wraps it in the service
/// layer, and serves the REST API over it.
pub struct HabitApiServer {
    config: AppConfig,
    service: Arc<HabitService>,
}

impl HabitApiServer {
    /// Build the server: select and initialize the configured repository
    /// and construct the service layer around it.
    pub async fn new(config: AppConfig) -> Result<Self, ServerError> {
        tracing::info!(
            storage = config.storage_mode.as_str(),
            "initializing habit tracker API server"
        );

        let repository = config::build_repository(&config).await?;
        let service = Arc::new(HabitService::new(repository));

        Ok(Self { config, service })
    }

    /// The application router. Integration tests drive this directly
    /// without binding a socket.
    pub fn router(&self) -> Result<Router, ServerError> {
        let state = AppState {
            service: self.service.clone(),
            config: self.config.clone(),
        };
        Ok(api::router(state)?)
    }

    /// Bind the configured port and serve until shutdown.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = self.router()?;
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("listening on http://{addr}");
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Get a reference to the service layer (useful for testing)
    pub fn service(&self) -> &Arc<HabitService> {
        &self.service
    }
}
