pub mod handlers;

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use unicompass_core::{Todo, TodoInput, TodoPatch, TodoStatus};

use crate::errors::AppError;

/// Trims the title and rejects an empty one.
pub fn validate_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    Ok(title.to_string())
}

/// `completed_at` after a status change: stamped on entering `completed`,
/// kept while staying there, cleared on leaving.
pub fn completed_at_after(
    previous: TodoStatus,
    next: TodoStatus,
    completed_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (previous, next) {
        (TodoStatus::Completed, TodoStatus::Completed) => completed_at.or(Some(now)),
        (_, TodoStatus::Completed) => Some(now),
        _ => None,
    }
}

/// Applies a partial update. Absent fields are left untouched.
pub fn apply_patch(todo: Todo, patch: TodoPatch, now: DateTime<Utc>) -> Result<Todo, AppError> {
    let title = match patch.title {
        Some(title) => validate_title(&title)?,
        None => todo.title,
    };
    let status = patch.status.unwrap_or(todo.status);

    Ok(Todo {
        completed_at: completed_at_after(todo.status, status, todo.completed_at, now),
        title,
        description: patch.description.or(todo.description),
        priority: patch.priority.unwrap_or(todo.priority),
        status,
        due_date: patch.due_date.or(todo.due_date),
        updated_at: Some(now),
        ..todo
    })
}

/// The caller's to-dos, newest first.
pub async fn list_todos(pool: &PgPool, user_id: i64) -> Result<Vec<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        "SELECT * FROM todo_tasks WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn find_todo<'e>(
    executor: impl PgExecutor<'e>,
    user_id: i64,
    todo_id: i64,
) -> Result<Option<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>("SELECT * FROM todo_tasks WHERE id = $1 AND user_id = $2")
        .bind(todo_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await
}

pub async fn insert_todo(
    pool: &PgPool,
    user_id: i64,
    input: &TodoInput,
    title: &str,
) -> Result<Todo, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        r#"
        INSERT INTO todo_tasks (user_id, university_id, title, description, priority, due_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(input.university_id)
    .bind(title)
    .bind(&input.description)
    .bind(input.priority.as_str())
    .bind(input.due_date)
    .fetch_one(pool)
    .await
}

pub async fn save_todo<'e>(executor: impl PgExecutor<'e>, todo: &Todo) -> Result<Todo, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        r#"
        UPDATE todo_tasks
        SET title = $3, description = $4, priority = $5, status = $6,
            due_date = $7, updated_at = $8, completed_at = $9
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(todo.id)
    .bind(todo.user_id)
    .bind(&todo.title)
    .bind(&todo.description)
    .bind(todo.priority.as_str())
    .bind(todo.status.as_str())
    .bind(todo.due_date)
    .bind(todo.updated_at)
    .bind(todo.completed_at)
    .fetch_one(executor)
    .await
}
