use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::models::{TaskRow, TASK_SELECT};
use crate::services::clock::{format_date, parse_date, Clock};
use shared::{Task, TaskRequest};

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found")]
    NotFound,
    #[error("Title is required")]
    EmptyTitle,
    #[error("Invalid date format. Use YYYY-MM-DD: {0:?}")]
    InvalidDate(String),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Validate a client-supplied date, normalizing it to `YYYY-MM-DD`.
pub fn validate_date(value: &str) -> Result<String, TaskError> {
    parse_date(value)
        .map(format_date)
        .ok_or_else(|| TaskError::InvalidDate(value.to_string()))
}

fn validate_title(title: &str) -> Result<&str, TaskError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    Ok(title)
}

/// Create a pending task due on `request.date`, or today when absent.
pub async fn create_task(
    pool: &SqlitePool,
    clock: &dyn Clock,
    request: &TaskRequest,
) -> Result<Task, TaskError> {
    let title = validate_title(&request.title)?;

    let date = match request.date.as_deref().map(str::trim) {
        Some(date) if !date.is_empty() => validate_date(date)?,
        _ => format_date(clock.today()),
    };
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO tasks (title, description, created_date, assigned_date, completed_date, is_completed, created_at, updated_at)
        VALUES (?, ?, ?, ?, NULL, 0, ?, ?)
        "#,
    )
    .bind(title)
    .bind(&request.description)
    .bind(&date)
    .bind(&date)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    log::debug!("Created task {} for {}", id, date);

    get_task(pool, id).await?.ok_or(TaskError::NotFound)
}

pub async fn get_task(pool: &SqlitePool, task_id: i64) -> Result<Option<Task>, TaskError> {
    let sql = format!("{} WHERE t.id = ?", TASK_SELECT);
    let task: Option<TaskRow> = sqlx::query_as(&sql)
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

    Ok(task.map(|t| t.to_shared()))
}

/// Rewrite title and description only; dates and completion are untouched.
pub async fn update_task(
    pool: &SqlitePool,
    task_id: i64,
    request: &TaskRequest,
) -> Result<Task, TaskError> {
    let title = validate_title(&request.title)?;

    let result = sqlx::query("UPDATE tasks SET title = ?, description = ?, updated_at = ? WHERE id = ?")
        .bind(title)
        .bind(&request.description)
        .bind(Utc::now())
        .bind(task_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(TaskError::NotFound);
    }

    get_task(pool, task_id).await?.ok_or(TaskError::NotFound)
}

/// Mark a task complete (stamped with today) or pending again.
///
/// Completing an already completed task restamps `completed_date` to today.
pub async fn update_task_completion(
    pool: &SqlitePool,
    clock: &dyn Clock,
    task_id: i64,
    is_completed: bool,
) -> Result<Task, TaskError> {
    let completed_date = is_completed.then(|| format_date(clock.today()));

    let result = sqlx::query(
        "UPDATE tasks SET is_completed = ?, completed_date = ?, updated_at = ? WHERE id = ?",
    )
    .bind(is_completed)
    .bind(&completed_date)
    .bind(Utc::now())
    .bind(task_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(TaskError::NotFound);
    }

    get_task(pool, task_id).await?.ok_or(TaskError::NotFound)
}

/// Set or clear a task's category. The category id is not checked.
pub async fn update_task_category(
    pool: &SqlitePool,
    task_id: i64,
    category_id: Option<i64>,
) -> Result<Task, TaskError> {
    let result = sqlx::query("UPDATE tasks SET category_id = ?, updated_at = ? WHERE id = ?")
        .bind(category_id)
        .bind(Utc::now())
        .bind(task_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(TaskError::NotFound);
    }

    get_task(pool, task_id).await?.ok_or(TaskError::NotFound)
}

/// Hard delete. Deleting an unknown id is not an error.
pub async fn delete_task(pool: &SqlitePool, task_id: i64) -> Result<(), TaskError> {
    sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(task_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Tasks due on `date` plus tasks completed on `date`, pending first.
pub async fn get_tasks_by_date(pool: &SqlitePool, date: &str) -> Result<Vec<Task>, TaskError> {
    let sql = format!(
        "{} WHERE t.assigned_date = ? OR (t.completed_date = ? AND t.is_completed = 1) \
         ORDER BY t.is_completed ASC, t.created_at ASC, t.id ASC",
        TASK_SELECT
    );
    let tasks: Vec<TaskRow> = sqlx::query_as(&sql)
        .bind(date)
        .bind(date)
        .fetch_all(pool)
        .await?;

    Ok(tasks.into_iter().map(|t| t.to_shared()).collect())
}

/// Pending tasks filed under a category, oldest assignment first.
pub async fn get_tasks_by_category(
    pool: &SqlitePool,
    category_id: i64,
) -> Result<Vec<Task>, TaskError> {
    let sql = format!(
        "{} WHERE t.category_id = ? AND t.is_completed = 0 \
         ORDER BY t.assigned_date ASC, t.created_at ASC, t.id ASC",
        TASK_SELECT
    );
    let tasks: Vec<TaskRow> = sqlx::query_as(&sql)
        .bind(category_id)
        .fetch_all(pool)
        .await?;

    Ok(tasks.into_iter().map(|t| t.to_shared()).collect())
}
