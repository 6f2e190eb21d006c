use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::models::CategoryRow;
use shared::{Category, CreateCategoryRequest, UpdateCategoryRequest, DEFAULT_CATEGORY_COLOR};

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category not found")]
    NotFound,
    #[error("Category name is required")]
    EmptyName,
    #[error("Category name already exists")]
    DuplicateName,
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

const CATEGORY_SELECT: &str = r#"
    SELECT c.id, c.name, c.color, c.created_at,
           (SELECT COUNT(*) FROM tasks t WHERE t.category_id = c.id AND t.is_completed = 0)
               AS task_count
    FROM categories c
"#;

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(e) if e.message().contains("UNIQUE constraint failed"))
}

fn validate_name(name: &str) -> Result<&str, CategoryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CategoryError::EmptyName);
    }
    Ok(name)
}

fn color_or_default(color: Option<&str>) -> &str {
    match color.map(str::trim) {
        Some(color) if !color.is_empty() => color,
        _ => DEFAULT_CATEGORY_COLOR,
    }
}

pub async fn create_category(
    pool: &SqlitePool,
    request: &CreateCategoryRequest,
) -> Result<Category, CategoryError> {
    let name = validate_name(&request.name)?;
    let color = color_or_default(request.color.as_deref());

    let result = sqlx::query("INSERT INTO categories (name, color, created_at) VALUES (?, ?, ?)")
        .bind(name)
        .bind(color)
        .bind(Utc::now())
        .execute(pool)
        .await;

    match result {
        Ok(done) => get_category(pool, done.last_insert_rowid())
            .await?
            .ok_or(CategoryError::NotFound),
        Err(e) if is_unique_violation(&e) => Err(CategoryError::DuplicateName),
        Err(e) => Err(CategoryError::DatabaseError(e)),
    }
}

pub async fn get_category(
    pool: &SqlitePool,
    category_id: i64,
) -> Result<Option<Category>, CategoryError> {
    let sql = format!("{} WHERE c.id = ?", CATEGORY_SELECT);
    let category: Option<CategoryRow> = sqlx::query_as(&sql)
        .bind(category_id)
        .fetch_optional(pool)
        .await?;

    Ok(category.map(|c| c.to_shared()))
}

/// All categories by name, each with its live pending-task count.
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<Category>, CategoryError> {
    let sql = format!("{} ORDER BY c.name ASC", CATEGORY_SELECT);
    let categories: Vec<CategoryRow> = sqlx::query_as(&sql).fetch_all(pool).await?;

    Ok(categories.into_iter().map(|c| c.to_shared()).collect())
}

/// Partial update: absent fields keep their stored value.
pub async fn update_category(
    pool: &SqlitePool,
    category_id: i64,
    request: &UpdateCategoryRequest,
) -> Result<Category, CategoryError> {
    let name = request.name.as_deref().map(validate_name).transpose()?;
    let color = request
        .color
        .as_deref()
        .map(|color| color_or_default(Some(color)));

    let result = sqlx::query(
        "UPDATE categories SET name = COALESCE(?, name), color = COALESCE(?, color) WHERE id = ?",
    )
    .bind(name)
    .bind(color)
    .bind(category_id)
    .execute(pool)
    .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => Err(CategoryError::NotFound),
        Ok(_) => get_category(pool, category_id)
            .await?
            .ok_or(CategoryError::NotFound),
        Err(e) if is_unique_violation(&e) => Err(CategoryError::DuplicateName),
        Err(e) => Err(CategoryError::DatabaseError(e)),
    }
}

/// Delete a category and detach the tasks that referenced it.
pub async fn delete_category(pool: &SqlitePool, category_id: i64) -> Result<(), CategoryError> {
    let mut tx = pool.begin().await?;

    let detached = sqlx::query("UPDATE tasks SET category_id = NULL, updated_at = ? WHERE category_id = ?")
        .bind(Utc::now())
        .bind(category_id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(category_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CategoryError::NotFound);
    }

    tx.commit().await?;

    log::info!(
        "Deleted category {} and detached {} task(s)",
        category_id,
        detached.rows_affected()
    );

    Ok(())
}
