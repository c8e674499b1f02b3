//! Hallbook meeting-hall booking client
//!
//! A Rust client for the hall booking REST backend: slot availability,
//! date-range selection and booking submission for requesters, plus the
//! approval, blocking and master-data screens for administrators.

use std::sync::Arc;

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod session;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::Repository;
use services::Services;
use session::{AuthContext, FileSessionStore, SessionStore};

/// Application state shared across all commands
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub session: Arc<AuthContext>,
    pub services: Arc<Services>,
}

impl AppState {
    /// Build the state with the session persisted at `config.session.path`
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let store = Arc::new(FileSessionStore::new(config.session.path.clone()));
        Self::with_store(config, store)
    }

    /// Build the state on top of any session store
    pub fn with_store(config: AppConfig, store: Arc<dyn SessionStore>) -> AppResult<Self> {
        let session = Arc::new(AuthContext::load(store)?);
        let repository = Arc::new(Repository::new(&config, session.clone())?);
        let services = Services::new(repository, &config, session.clone())?;

        Ok(Self {
            config: Arc::new(config),
            session,
            services: Arc::new(services),
        })
    }
}
