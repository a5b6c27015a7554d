//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use idea_radar_core::ports::DatabaseService;
use idea_radar_core::{IdeaSynthesisService, NewsIngestionService};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub ingestion: Arc<NewsIngestionService>,
    pub synthesis: Arc<IdeaSynthesisService>,
}

impl AppState {
    /// Wires both pipelines to the same store.
    pub fn new(
        db: Arc<dyn DatabaseService>,
        ingestion: NewsIngestionService,
        synthesis: IdeaSynthesisService,
    ) -> Self {
        Self {
            db,
            ingestion: Arc::new(ingestion),
            synthesis: Arc::new(synthesis),
        }
    }
}
