use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-date activity counts (from the history aggregation query)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct HistorySummaryRow {
    pub date: String,
    pub completed_count: i64,
    pub pending_count: i64,
}

impl HistorySummaryRow {
    pub fn has_activity(&self) -> bool {
        self.completed_count > 0 || self.pending_count > 0
    }

    pub fn to_shared(&self) -> shared::HistorySummary {
        shared::HistorySummary {
            date: self.date.clone(),
            completed_count: self.completed_count,
            pending_count: self.pending_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_date_has_no_activity() {
        let row = HistorySummaryRow {
            date: "2025-03-09".to_string(),
            completed_count: 0,
            pending_count: 0,
        };
        assert!(!row.has_activity());

        let row = HistorySummaryRow {
            pending_count: 2,
            ..row
        };
        assert!(row.has_activity());
        assert_eq!(row.to_shared().pending_count, 2);
    }
}
