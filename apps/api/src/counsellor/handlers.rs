use axum::{extract::State, Json};
use tracing::info;
use unicompass_core::{AnalysisResponse, ChatRequest, ChatResponse};

use crate::auth::CurrentUser;
use crate::counsellor::ChatContext;
use crate::errors::AppError;
use crate::profile::require_profile;
use crate::state::AppState;
use crate::universities::{list_locked, list_shortlisted};

/// POST /api/counsellor/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }
    current.require_onboarded()?;

    let user_id = current.user.id;
    let profile = require_profile(&state.db, user_id).await?;

    let (shortlisted, locked) = tokio::try_join!(
        list_shortlisted(&state.db, user_id),
        list_locked(&state.db, user_id),
    )?;
    let context = ChatContext {
        stage: current.user.current_stage,
        shortlisted: shortlisted
            .iter()
            .map(|s| format!("{} ({})", s.university.name, s.category))
            .collect(),
        locked: locked.into_iter().map(|u| u.name).collect(),
    };

    info!("Counsellor chat for user {user_id} at stage {}", context.stage);
    let response = state.counsellor.chat(&profile, &context, message).await?;
    Ok(Json(ChatResponse { response }))
}

/// GET /api/counsellor/analysis
pub async fn handle_analysis(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<AnalysisResponse>, AppError> {
    current.require_onboarded()?;

    let profile = require_profile(&state.db, current.user.id).await?;
    let analysis = state.counsellor.analyze(&profile).await?;
    Ok(Json(AnalysisResponse { analysis }))
}
