use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::services::clock::{format_date, parse_date, Clock};

#[derive(Debug, Error)]
pub enum RolloverError {
    #[error("Invalid date format. Use YYYY-MM-DD: {0:?}")]
    InvalidDate(String),
    #[error("Cannot roll tasks back from {from} to {to}")]
    Backwards { from: String, to: String },
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Normalized dates a rollover ran between and how many tasks it moved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloverOutcome {
    pub from_date: String,
    pub to_date: String,
    pub tasks_moved: u64,
}

fn normalize(value: &str) -> Result<String, RolloverError> {
    parse_date(value.trim())
        .map(format_date)
        .ok_or_else(|| RolloverError::InvalidDate(value.to_string()))
}

/// Move every pending task assigned to `from_date` onto `to_date`.
///
/// `created_date` is left alone, so drag keeps growing across rollovers.
pub async fn rollover_tasks(
    pool: &SqlitePool,
    from_date: &str,
    to_date: &str,
) -> Result<RolloverOutcome, RolloverError> {
    let from = normalize(from_date)?;
    let to = normalize(to_date)?;

    if to < from {
        return Err(RolloverError::Backwards { from, to });
    }

    let result = sqlx::query(
        "UPDATE tasks SET assigned_date = ?, updated_at = ? WHERE assigned_date = ? AND is_completed = 0",
    )
    .bind(&to)
    .bind(Utc::now())
    .bind(&from)
    .execute(pool)
    .await?;

    let tasks_moved = result.rows_affected();
    log::info!("Rolled over {} task(s) from {} to {}", tasks_moved, from, to);

    Ok(RolloverOutcome {
        from_date: from,
        to_date: to,
        tasks_moved,
    })
}

/// Move every pending task assigned before `to_date` onto `to_date`.
pub async fn rollover_all_pending_tasks(
    pool: &SqlitePool,
    to_date: &str,
) -> Result<u64, RolloverError> {
    let to = normalize(to_date)?;

    let result = sqlx::query(
        "UPDATE tasks SET assigned_date = ?, updated_at = ? WHERE assigned_date < ? AND is_completed = 0",
    )
    .bind(&to)
    .bind(Utc::now())
    .bind(&to)
    .execute(pool)
    .await?;

    let moved = result.rows_affected();
    log::info!("Rolled over {} pending task(s) to {}", moved, to);

    Ok(moved)
}

/// Yesterday's unfinished work moves to today.
pub async fn auto_rollover(
    pool: &SqlitePool,
    clock: &dyn Clock,
) -> Result<RolloverOutcome, RolloverError> {
    let from_date = format_date(clock.yesterday());
    let to_date = format_date(clock.today());

    rollover_tasks(pool, &from_date, &to_date).await
}
