//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the startup configuration and the level store. Nothing here is
//! mutable: all level state lives on disk.

use std::sync::Arc;

use crate::config::Config;
use crate::services::levels::LevelStore;

/// Shared application state. Clone is required by Axum; clones share the config.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub levels: LevelStore,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let levels = LevelStore::new(config.levels_dir.clone());
        Self { config: Arc::new(config), levels }
    }
}
