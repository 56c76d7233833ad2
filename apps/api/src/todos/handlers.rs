use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;
use unicompass_core::{MessageResponse, Todo, TodoInput, TodoPatch};

use crate::auth::CurrentUser;
use crate::db::is_foreign_key_violation;
use crate::errors::AppError;
use crate::state::AppState;
use crate::todos::{apply_patch, find_todo, insert_todo, list_todos, save_todo, validate_title};

fn todo_not_found() -> AppError {
    AppError::NotFound("Todo not found".to_string())
}

/// GET /api/todos
pub async fn handle_list_todos(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<Todo>>, AppError> {
    Ok(Json(list_todos(&state.db, current.user.id).await?))
}

/// POST /api/todos
pub async fn handle_create_todo(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(input): Json<TodoInput>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let title = validate_title(&input.title)?;

    let todo = insert_todo(&state.db, current.user.id, &input, &title)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::Validation("University not found".to_string())
            } else {
                e.into()
            }
        })?;

    info!("User {} created todo {}", current.user.id, todo.id);
    Ok((StatusCode::CREATED, Json(todo)))
}

/// PATCH /api/todos/:id
pub async fn handle_update_todo(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(todo_id): Path<i64>,
    Json(patch): Json<TodoPatch>,
) -> Result<Json<Todo>, AppError> {
    let mut tx = state.db.begin().await?;

    let todo = find_todo(&mut *tx, current.user.id, todo_id)
        .await?
        .ok_or_else(todo_not_found)?;
    let updated = apply_patch(todo, patch, Utc::now())?;
    let saved = save_todo(&mut *tx, &updated).await?;

    tx.commit().await?;
    Ok(Json(saved))
}

/// DELETE /api/todos/:id
pub async fn handle_delete_todo(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(todo_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let result = sqlx::query("DELETE FROM todo_tasks WHERE id = $1 AND user_id = $2")
        .bind(todo_id)
        .bind(current.user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(todo_not_found());
    }

    info!("User {} deleted todo {todo_id}", current.user.id);
    Ok(Json(MessageResponse::new("Todo deleted successfully")))
}
