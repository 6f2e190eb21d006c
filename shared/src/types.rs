use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Color given to categories created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#58a6ff";

// ============================================================================
// Category Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    /// Number of pending tasks referencing this category
    #[serde(default)]
    pub task_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

// ============================================================================
// Task Types
// ============================================================================

/// A task anchored to calendar dates.
///
/// `created_date` never changes; `assigned_date` only moves forward through
/// rollover. `drag_days` is derived on every read and is not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_date: String,
    pub assigned_date: String,
    pub completed_date: Option<String>,
    pub is_completed: bool,
    pub category_id: Option<i64>,
    pub category: Option<Category>,
    pub drag_days: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for creating and updating tasks. `date` is only honored on create.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteTaskRequest {
    pub is_completed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskCategoryRequest {
    #[serde(default)]
    pub category_id: Option<i64>,
}

// ============================================================================
// Log Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: String,
    pub tasks: Vec<Task>,
    pub completed_count: i64,
    pub pending_count: i64,
}

impl DailyLog {
    /// Build a log for `date`, counting completed and pending tasks.
    pub fn from_tasks(date: impl Into<String>, tasks: Vec<Task>) -> Self {
        let completed_count = tasks.iter().filter(|t| t.is_completed).count() as i64;
        let pending_count = tasks.len() as i64 - completed_count;

        Self {
            date: date.into(),
            tasks,
            completed_count,
            pending_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub date: String,
    pub completed_count: i64,
    pub pending_count: i64,
}

// ============================================================================
// Rollover Types
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RolloverRequest {
    #[serde(default)]
    pub from_date: String,
    #[serde(default)]
    pub to_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolloverResponse {
    pub message: String,
    pub tasks_moved: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    pub to_date: String,
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
