use axum::{extract::State, http::StatusCode, Form, Json};
use serde::Deserialize;
use tracing::info;
use unicompass_core::{MessageResponse, RegisterRequest, TokenResponse, User};

use crate::auth::{
    hash_password, issue_token, normalize_email, revoke_token, verify_password, CurrentUser,
    MIN_PASSWORD_LEN,
};
use crate::db::is_unique_violation;
use crate::errors::AppError;
use crate::state::AppState;

/// OAuth2 password-grant form; `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    if !req.email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if req.full_name.trim().is_empty() {
        return Err(AppError::Validation("Full name is required".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    validate_registration(&req)?;
    let email = normalize_email(&req.email);
    let hashed = hash_password(&req.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, hashed_password, full_name)
        VALUES ($1, $2, $3)
        RETURNING id, email, full_name, is_onboarded, current_stage
        "#,
    )
    .bind(&email)
    .bind(&hashed)
    .bind(req.full_name.trim())
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Validation("Email already registered".to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    info!("Registered user {}", user.id);
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/auth/login (form-encoded)
pub async fn handle_login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let email = normalize_email(&form.username);
    let row: Option<(i64, String)> =
        sqlx::query_as("SELECT id, hashed_password FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&state.db)
            .await?;

    let user_id = match row {
        Some((id, hash)) if verify_password(&form.password, &hash) => id,
        _ => {
            return Err(AppError::Unauthorized(
                "Incorrect email or password".to_string(),
            ))
        }
    };

    let token = issue_token(
        &state.db,
        user_id,
        state.config.access_token_expire_minutes,
    )
    .await?;

    info!("Issued token for user {user_id}");
    Ok(Json(TokenResponse {
        access_token: token.to_string(),
        token_type: "bearer".to_string(),
    }))
}

/// GET /api/auth/me
pub async fn handle_me(current: CurrentUser) -> Json<User> {
    Json(current.user)
}

/// POST /api/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<MessageResponse>, AppError> {
    revoke_token(&state.db, current.token).await?;
    Ok(Json(MessageResponse::new("Logged out")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str, name: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: password.into(),
            full_name: name.into(),
        }
    }

    #[test]
    fn test_registration_accepts_valid_input() {
        assert!(validate_registration(&request("a@b.co", "secret1", "Ana")).is_ok());
    }

    #[test]
    fn test_registration_rejects_short_password() {
        let err = validate_registration(&request("a@b.co", "12345", "Ana")).unwrap_err();
        assert!(err.to_string().contains("at least 6"));
    }

    #[test]
    fn test_registration_rejects_blank_name_and_bad_email() {
        assert!(validate_registration(&request("a@b.co", "secret1", "  ")).is_err());
        assert!(validate_registration(&request("not-an-email", "secret1", "Ana")).is_err());
    }
}
