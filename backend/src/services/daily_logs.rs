use sqlx::SqlitePool;

use crate::models::{HistorySummaryRow, TaskRow, TASK_SELECT};
use crate::services::tasks::{self as task_service, TaskError};
use shared::{DailyLog, HistorySummary};

/// Everything due or finished on `date`, with counts.
pub async fn get_daily_log(pool: &SqlitePool, date: &str) -> Result<DailyLog, TaskError> {
    let tasks = task_service::get_tasks_by_date(pool, date).await?;
    Ok(DailyLog::from_tasks(date, tasks))
}

/// Every date that was assigned to or completed on by some task, newest first.
pub async fn get_all_dates(pool: &SqlitePool) -> Result<Vec<String>, TaskError> {
    let dates: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT date FROM (
            SELECT assigned_date AS date FROM tasks
            UNION
            SELECT completed_date AS date FROM tasks WHERE completed_date IS NOT NULL
        )
        ORDER BY date DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(dates)
}

/// Completed and still-pending counts for each date with any activity.
pub async fn get_history_summaries(pool: &SqlitePool) -> Result<Vec<HistorySummary>, TaskError> {
    let rows: Vec<HistorySummaryRow> = sqlx::query_as(
        r#"
        SELECT d.date AS date,
               (SELECT COUNT(*) FROM tasks WHERE completed_date = d.date AND is_completed = 1)
                   AS completed_count,
               (SELECT COUNT(*) FROM tasks WHERE assigned_date = d.date AND is_completed = 0)
                   AS pending_count
        FROM (
            SELECT assigned_date AS date FROM tasks
            UNION
            SELECT completed_date AS date FROM tasks WHERE completed_date IS NOT NULL
        ) d
        ORDER BY d.date DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .filter(|row| row.has_activity())
        .map(|row| row.to_shared())
        .collect())
}

/// What was accomplished on `date`. Work left pending that day is not listed.
pub async fn get_historical_log(pool: &SqlitePool, date: &str) -> Result<DailyLog, TaskError> {
    let sql = format!(
        "{} WHERE t.completed_date = ? AND t.is_completed = 1 ORDER BY t.created_at ASC, t.id ASC",
        TASK_SELECT
    );
    let rows: Vec<TaskRow> = sqlx::query_as(&sql).bind(date).fetch_all(pool).await?;

    let tasks: Vec<_> = rows.into_iter().map(|t| t.to_shared()).collect();
    Ok(DailyLog {
        date: date.to_string(),
        completed_count: tasks.len() as i64,
        pending_count: 0,
        tasks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::services::clock::FixedClock;
    use crate::services::rollover;
    use crate::services::tasks::{create_task, update_task_completion};
    use shared::{Task, TaskRequest};

    async fn add(pool: &SqlitePool, clock: &FixedClock, title: &str, date: Option<&str>) -> Task {
        let request = TaskRequest {
            title: title.to_string(),
            description: String::new(),
            date: date.map(str::to_string),
        };
        create_task(pool, clock, &request).await.unwrap()
    }

    /// T1 pending and T2 completed on 2025-03-10; T3 backfilled onto 2025-03-10
    /// from 2025-03-11. Clock is left on 2025-03-11.
    async fn march_scenario(pool: &SqlitePool, clock: &FixedClock) -> (Task, Task, Task) {
        clock.set("2025-03-10");
        let t1 = add(pool, clock, "T1", None).await;
        let t2 = add(pool, clock, "T2", None).await;
        update_task_completion(pool, clock, t2.id, true).await.unwrap();

        clock.set("2025-03-11");
        let t3 = add(pool, clock, "T3", Some("2025-03-10")).await;

        (t1, t2, t3)
    }

    #[tokio::test]
    async fn test_daily_log_unions_due_and_done() {
        let pool = test_pool().await;
        let clock = FixedClock::new("2025-03-10");
        let (t1, t2, t3) = march_scenario(&pool, &clock).await;

        let log = get_daily_log(&pool, "2025-03-10").await.unwrap();

        let ids: Vec<i64> = log.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![t1.id, t3.id, t2.id]);
        assert_eq!(log.completed_count, 1);
        assert_eq!(log.pending_count, 2);
    }

    #[tokio::test]
    async fn test_daily_log_for_empty_date() {
        let pool = test_pool().await;

        let log = get_daily_log(&pool, "2025-03-09").await.unwrap();
        assert!(log.tasks.is_empty());
        assert_eq!(log.completed_count, 0);
        assert_eq!(log.pending_count, 0);
    }

    #[tokio::test]
    async fn test_historical_log_is_accomplishment_only() {
        let pool = test_pool().await;
        let clock = FixedClock::new("2025-03-10");
        let (_, t2, _) = march_scenario(&pool, &clock).await;

        let outcome = rollover::auto_rollover(&pool, &clock).await.unwrap();
        assert_eq!(outcome.tasks_moved, 2);

        let log = get_historical_log(&pool, "2025-03-10").await.unwrap();
        assert_eq!(log.completed_count, 1);
        assert_eq!(log.pending_count, 0);
        assert_eq!(log.tasks.len(), 1);
        assert_eq!(log.tasks[0].id, t2.id);
    }

    #[tokio::test]
    async fn test_history_summaries_skip_silent_dates() {
        let pool = test_pool().await;
        let clock = FixedClock::new("2025-03-10");
        march_scenario(&pool, &clock).await;
        rollover::auto_rollover(&pool, &clock).await.unwrap();

        let summaries = get_history_summaries(&pool).await.unwrap();

        assert_eq!(
            summaries,
            vec![
                HistorySummary {
                    date: "2025-03-11".to_string(),
                    completed_count: 0,
                    pending_count: 2,
                },
                HistorySummary {
                    date: "2025-03-10".to_string(),
                    completed_count: 1,
                    pending_count: 0,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_history_summaries_drop_dates_left_empty() {
        let pool = test_pool().await;
        let clock = FixedClock::new("2025-03-10");
        let task = add(&pool, &clock, "T", Some("2025-03-07")).await;
        update_task_completion(&pool, &clock, task.id, true).await.unwrap();

        // 2025-03-07 is still a known date but the task counts toward 2025-03-10
        let dates = get_all_dates(&pool).await.unwrap();
        assert_eq!(dates, vec!["2025-03-10", "2025-03-07"]);

        let summaries = get_history_summaries(&pool).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].date, "2025-03-10");
    }

    #[tokio::test]
    async fn test_all_dates_descending_and_unique() {
        let pool = test_pool().await;
        let clock = FixedClock::new("2025-03-10");
        add(&pool, &clock, "a", Some("2025-03-08")).await;
        add(&pool, &clock, "b", Some("2025-03-08")).await;
        let c = add(&pool, &clock, "c", Some("2025-03-09")).await;
        update_task_completion(&pool, &clock, c.id, true).await.unwrap();

        let dates = get_all_dates(&pool).await.unwrap();

        assert_eq!(dates, vec!["2025-03-10", "2025-03-09", "2025-03-08"]);
        assert!(dates.windows(2).all(|w| w[0] > w[1]));
    }
}
