use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for categories, with the live count of pending tasks
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub task_count: i64,
}

impl CategoryRow {
    pub fn to_shared(&self) -> shared::Category {
        shared::Category {
            id: self.id,
            name: self.name.clone(),
            color: self.color.clone(),
            created_at: self.created_at,
            task_count: self.task_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_row_to_shared() {
        let now = Utc::now();

        let row = CategoryRow {
            id: 4,
            name: "Errands".to_string(),
            color: "#FF5733".to_string(),
            created_at: now,
            task_count: 3,
        };

        let shared = row.to_shared();

        assert_eq!(shared.id, 4);
        assert_eq!(shared.name, "Errands");
        assert_eq!(shared.color, "#FF5733");
        assert_eq!(shared.created_at, now);
        assert_eq!(shared.task_count, 3);
    }
}
