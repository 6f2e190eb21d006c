use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::services::drag;

/// Column list every task read selects, joined with the task's category.
///
/// A dangling `category_id` leaves the `category_*` columns NULL.
pub const TASK_SELECT: &str = r#"
    SELECT t.id, t.title, COALESCE(t.description, '') AS description,
           t.created_date, t.assigned_date, t.completed_date,
           COALESCE(t.is_completed, 0) AS is_completed, t.category_id,
           t.created_at, t.updated_at,
           c.name AS category_name, c.color AS category_color,
           c.created_at AS category_created_at,
           (SELECT COUNT(*) FROM tasks p WHERE p.category_id = c.id AND p.is_completed = 0)
               AS category_task_count
    FROM tasks t
    LEFT JOIN categories c ON c.id = t.category_id
"#;

/// Database model for tasks with their category (from JOIN)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_date: String,
    pub assigned_date: String,
    pub completed_date: Option<String>,
    pub is_completed: bool,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
    pub category_created_at: Option<DateTime<Utc>>,
    pub category_task_count: i64,
}

impl TaskRow {
    fn category(&self) -> Option<shared::Category> {
        let id = self.category_id?;
        let name = self.category_name.clone()?;

        Some(shared::Category {
            id,
            name,
            color: self
                .category_color
                .clone()
                .unwrap_or_else(|| shared::DEFAULT_CATEGORY_COLOR.to_string()),
            created_at: self.category_created_at.unwrap_or(self.created_at),
            task_count: self.category_task_count,
        })
    }

    pub fn to_shared(&self) -> shared::Task {
        shared::Task {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            created_date: self.created_date.clone(),
            assigned_date: self.assigned_date.clone(),
            completed_date: self.completed_date.clone(),
            is_completed: self.is_completed,
            category_id: self.category_id,
            category: self.category(),
            drag_days: drag::business_days(&self.created_date, &self.assigned_date),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> TaskRow {
        let now = Utc::now();
        TaskRow {
            id: 1,
            title: "write report".to_string(),
            description: "".to_string(),
            created_date: "2025-01-06".to_string(),
            assigned_date: "2025-01-06".to_string(),
            completed_date: None,
            is_completed: false,
            category_id: None,
            created_at: now,
            updated_at: now,
            category_name: None,
            category_color: None,
            category_created_at: None,
            category_task_count: 0,
        }
    }

    #[test]
    fn test_task_row_to_shared() {
        let shared = row().to_shared();

        assert_eq!(shared.id, 1);
        assert_eq!(shared.title, "write report");
        assert_eq!(shared.created_date, "2025-01-06");
        assert_eq!(shared.drag_days, 0);
        assert!(shared.completed_date.is_none());
        assert!(shared.category.is_none());
    }

    #[test]
    fn test_task_row_drag_days_follow_assigned_date() {
        let row = TaskRow {
            assigned_date: "2025-01-13".to_string(),
            ..row()
        };

        assert_eq!(row.to_shared().drag_days, 5);
    }

    #[test]
    fn test_task_row_with_category() {
        let row = TaskRow {
            category_id: Some(2),
            category_name: Some("Personal".to_string()),
            category_color: Some("#3fb950".to_string()),
            category_created_at: Some(Utc::now()),
            category_task_count: 4,
            ..row()
        };

        let category = row.to_shared().category.unwrap();
        assert_eq!(category.id, 2);
        assert_eq!(category.name, "Personal");
        assert_eq!(category.task_count, 4);
    }

    #[test]
    fn test_task_row_with_dangling_category() {
        let row = TaskRow {
            category_id: Some(99),
            ..row()
        };

        let shared = row.to_shared();
        assert_eq!(shared.category_id, Some(99));
        assert!(shared.category.is_none());
    }
}
