use axum::{extract::State, http::StatusCode, Json};
use tracing::info;
use unicompass_core::{Profile, ProfileInput, Stage};

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::profile::validation::validate_profile;
use crate::profile::{get_profile, merge_profile, upsert_profile};
use crate::state::AppState;

/// GET /api/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Profile>, AppError> {
    let profile = get_profile(&state.db, current.user.id).await?.ok_or_else(|| {
        AppError::NotFound("Profile not found. Please complete onboarding.".to_string())
    })?;
    Ok(Json(profile))
}

/// POST /api/profile
/// Creates or updates the profile and completes onboarding. The stage only
/// moves forward: a student already past onboarding keeps their stage.
pub async fn handle_save_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(input): Json<ProfileInput>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let errors = validate_profile(&input);
    if !errors.is_empty() {
        return Err(AppError::InvalidFields(errors));
    }

    let user_id = current.user.id;
    let mut tx = state.db.begin().await?;

    let existing = get_profile(&mut *tx, user_id).await?;
    let merged = merge_profile(existing, user_id, input);
    let saved = upsert_profile(&mut *tx, &merged).await?;

    sqlx::query(
        r#"
        UPDATE users
        SET is_onboarded = TRUE,
            current_stage = CASE WHEN current_stage = $2 THEN $3 ELSE current_stage END,
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(Stage::Onboarding.as_str())
    .bind(Stage::Dashboard.as_str())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!("Saved profile for user {user_id}");
    Ok((StatusCode::CREATED, Json(saved)))
}
