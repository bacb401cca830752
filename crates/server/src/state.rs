//! Shared application state.

use std::sync::Arc;

use cuadro_core::engine::{EngineOptions, ExtractionEngine};
use cuadro_core::lopdf_backend::LopdfBackend;
use cuadro_core::store::MemoryStore;

use crate::config::Config;

/// Everything a request handler needs: the extraction engine (with its
/// content-addressed cache) and the per-request result store.
pub struct AppState {
    pub engine: ExtractionEngine<LopdfBackend, MemoryStore>,
    pub results: MemoryStore,
    pub config: Config,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: Config) -> SharedState {
        let options = EngineOptions {
            threads: config.worker_threads,
            ..Default::default()
        };
        let engine = ExtractionEngine::with_options(LopdfBackend, MemoryStore::new(), options);
        Arc::new(AppState {
            engine,
            results: MemoryStore::new(),
            config,
        })
    }
}
