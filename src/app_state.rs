use sqlx::PgPool;
use std::sync::Arc;

use crate::services::{storage::ObjectStore, vision::VisionService};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub storage: Arc<dyn ObjectStore>,
    pub vision: Arc<dyn VisionService>,
}

impl AppState {
    pub fn new(db: PgPool, storage: Arc<dyn ObjectStore>, vision: Arc<dyn VisionService>) -> Self {
        Self {
            db,
            storage,
            vision,
        }
    }
}
