//! Client for the Ataasil e-learning platform: course progress tracking,
//! certificate eligibility, navigation guards and the REST calls behind them.

use std::sync::Arc;

pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod api;
pub mod cache;
pub mod context;
pub use context::{AppContext, ContextError, ContextResult};
pub mod error;
pub mod model;
pub mod routing;
pub mod session;
pub mod tracker;
pub mod utils;

use crate::error::AppResult;
use crate::session::{FileSessionStore, SessionStore};

static APPLICATION_NAME: &str = "ataasil";

/// Installs the global tracing subscriber. Call once.
pub fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}

/// Loads the config and builds a context backed by the session file.
#[tracing::instrument]
pub async fn build_context(use_local: bool) -> AppResult<AppContext> {
    let config = Config::load(use_local)?;

    let path = match config.session().path() {
        Some(path) => path.clone(),
        None => FileSessionStore::default_path()?,
    };
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(path));

    Ok(AppContext::init(config, store).await?)
}
