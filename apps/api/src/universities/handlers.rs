use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use unicompass_core::{
    LockRequest, MessageResponse, RecommendedUniversity, ShortlistRequest, ShortlistedUniversity,
    Stage, TransitionError, University,
};

use crate::auth::CurrentUser;
use crate::db::{is_foreign_key_violation, is_unique_violation};
use crate::errors::AppError;
use crate::profile::get_profile;
use crate::state::AppState;
use crate::universities::catalog::{fetch_catalog, rank_catalog, CatalogQuery};
use crate::universities::{find_university, interest_state, list_locked, list_shortlisted};

/// List responses that wrap their items in `{"data": [...]}`.
#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub data: Vec<T>,
}

fn university_not_found() -> AppError {
    AppError::NotFound("University not found".to_string())
}

/// GET /api/universities
/// Filtered catalog page, best match for the caller first.
pub async fn handle_list_universities(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<RecommendedUniversity>>, AppError> {
    current.require_onboarded()?;

    let profile = get_profile(&state.db, current.user.id).await?;
    let universities = fetch_catalog(&state.db, &query, profile.as_ref()).await?;
    Ok(Json(rank_catalog(universities, profile.as_ref())))
}

/// GET /api/universities/:id
pub async fn handle_get_university(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<University>, AppError> {
    current.require_onboarded()?;

    let university = find_university(&state.db, id)
        .await?
        .ok_or_else(university_not_found)?;
    Ok(Json(university))
}

/// POST /api/universities/shortlist
pub async fn handle_shortlist(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<ShortlistRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let user_id = current.user.id;
    let mut tx = state.db.begin().await?;

    find_university(&mut *tx, req.university_id)
        .await?
        .ok_or_else(university_not_found)?;
    interest_state(&mut *tx, user_id, req.university_id)
        .await?
        .shortlist()?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO shortlisted_universities (user_id, university_id, category, notes)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(req.university_id)
    .bind(req.category.as_str())
    .bind(&req.notes)
    .execute(&mut *tx)
    .await;

    match inserted {
        Ok(_) => {}
        // Lost a race against a concurrent shortlist of the same university.
        Err(e) if is_unique_violation(&e) => {
            return Err(TransitionError::AlreadyShortlisted.into())
        }
        Err(e) => return Err(e.into()),
    }
    tx.commit().await?;

    info!(
        "User {user_id} shortlisted university {} as {}",
        req.university_id, req.category
    );
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("University shortlisted successfully")),
    ))
}

/// GET /api/universities/shortlisted
pub async fn handle_list_shortlisted(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<DataEnvelope<ShortlistedUniversity>>, AppError> {
    let data = list_shortlisted(&state.db, current.user.id).await?;
    Ok(Json(DataEnvelope { data }))
}

/// POST /api/universities/lock
/// Locks a shortlisted university and moves the caller to the application stage.
pub async fn handle_lock(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<LockRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let user_id = current.user.id;
    let mut tx = state.db.begin().await?;

    interest_state(&mut *tx, user_id, req.university_id)
        .await?
        .lock()?;

    let inserted = sqlx::query(
        "INSERT INTO locked_universities (user_id, university_id) VALUES ($1, $2)",
    )
    .bind(user_id)
    .bind(req.university_id)
    .execute(&mut *tx)
    .await;

    match inserted {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(TransitionError::AlreadyLocked.into())
        }
        // The shortlist entry vanished between the check and the insert.
        Err(e) if is_foreign_key_violation(&e) => {
            return Err(TransitionError::NotShortlisted.into())
        }
        Err(e) => return Err(e.into()),
    }

    sqlx::query("UPDATE users SET current_stage = $2, updated_at = now() WHERE id = $1")
        .bind(user_id)
        .bind(Stage::Application.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!("User {user_id} locked university {}", req.university_id);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("University locked successfully")),
    ))
}

/// GET /api/universities/locked
pub async fn handle_list_locked(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<DataEnvelope<University>>, AppError> {
    let data = list_locked(&state.db, current.user.id).await?;
    Ok(Json(DataEnvelope { data }))
}

/// DELETE /api/universities/lock/:id
/// The university stays shortlisted and the stage is left as is.
pub async fn handle_unlock(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(university_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let user_id = current.user.id;
    let mut tx = state.db.begin().await?;

    interest_state(&mut *tx, user_id, university_id)
        .await?
        .unlock()?;

    let deleted =
        sqlx::query("DELETE FROM locked_universities WHERE user_id = $1 AND university_id = $2")
            .bind(user_id)
            .bind(university_id)
            .execute(&mut *tx)
            .await?;
    // A concurrent unlock already removed the row.
    if deleted.rows_affected() == 0 {
        return Err(TransitionError::NotLocked.into());
    }
    tx.commit().await?;

    info!("User {user_id} unlocked university {university_id}");
    Ok(Json(MessageResponse::new("University unlocked successfully")))
}
