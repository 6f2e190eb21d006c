use std::sync::Arc;
use sqlx::SqlitePool;

use crate::services::clock::Clock;

pub mod category;
pub mod history;
pub mod task;

pub use category::*;
pub use history::*;
pub use task::*;

/// Application state shared across all handlers
pub struct AppState {
    pub db: SqlitePool,
    pub clock: Arc<dyn Clock>,
}
