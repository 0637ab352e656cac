//! Handlers for the signed-in user's own account.

use axum::extract::State;
use axum::Json;
use rentfleet_core::error::CoreError;
use rentfleet_db::models::user::{UpdateUser, UserResponse};
use rentfleet_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `PUT /account`. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3 to 50 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "A valid email address is required"))]
    pub email: Option<String>,
    pub password: Option<String>,
}

/// GET /api/v1/account
pub async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/v1/account
///
/// Update username, email and/or password. Role and active flag are not
/// self-service.
pub async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateAccountRequest>,
) -> AppResult<Json<UserResponse>> {
    input.validate()?;

    let username = input.username.as_deref().map(str::trim);
    if let Some(username) = username {
        if UserRepo::username_taken(&state.pool, username, Some(auth.user_id)).await? {
            return Err(AppError::Core(CoreError::Conflict(
                "Username already exists".into(),
            )));
        }
    }

    if let Some(password) = &input.password {
        validate_password_strength(password, MIN_PASSWORD_LENGTH)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
        let hashed = hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
        UserRepo::update_password(&state.pool, auth.user_id, &hashed).await?;
        tracing::info!(user_id = auth.user_id, "Password changed");
    }

    let update = UpdateUser {
        username: username.map(str::to_string),
        email: input.email.map(|e| e.trim().to_string()),
        ..Default::default()
    };
    let user = UserRepo::update(&state.pool, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(UserResponse::from(&user)))
}
