use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::{self, AuthKeys, AuthUser};
use crate::db::DbPool;
use crate::dto::{LoginDto, RegisterDto, TokenResponse, UpdateProfileDto, UserResponse};
use crate::errors::ApiError;
use crate::repo;

/// Handler for registering a new user account
///
/// This function handles POST requests to `/api/auth/register`. A fresh
/// account starts with the default syllabus seeded and an access token
/// already issued, so the client can proceed straight to authenticated
/// calls.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `auth` - The token signing keys
/// * `payload` - The request payload containing email, password and name
///
/// ### Returns
///
/// The issued bearer token together with the user profile as JSON
///
/// ### Errors
///
/// Returns a conflict error when the email is already registered
#[instrument(skip(pool, auth, payload), fields(email = %payload.email))]
pub async fn register_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    State(auth): State<AuthKeys>,
    Json(payload): Json<RegisterDto>,
) -> Result<Json<TokenResponse>, ApiError> {
    info!("Registering new user");

    let existing = repo::get_user_by_email(&pool, &payload.email).map_err(ApiError::Database)?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = auth::hash_password(&payload.password).map_err(ApiError::Database)?;

    let user = repo::create_user(&pool, &payload.email, &password_hash, &payload.name)
        .map_err(ApiError::Database)?;

    let token = auth.issue_token(&user.id).map_err(ApiError::Database)?;

    info!("Successfully registered user with id: {}", user.id);

    Ok(Json(TokenResponse::new(token, &user)))
}

/// Handler for logging in with email and password
///
/// This function handles POST requests to `/api/auth/login`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `auth` - The token signing keys
/// * `payload` - The request payload containing the credentials
///
/// ### Returns
///
/// A fresh bearer token together with the user profile as JSON
///
/// ### Errors
///
/// Returns an unauthorized error when the email is unknown or the
/// password does not match, without revealing which check failed
#[instrument(skip(pool, auth, payload), fields(email = %payload.email))]
pub async fn login_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    State(auth): State<AuthKeys>,
    Json(payload): Json<LoginDto>,
) -> Result<Json<TokenResponse>, ApiError> {
    info!("Logging in user");

    let user = repo::get_user_by_email(&pool, &payload.email)
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !auth::verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::Unauthorized("Invalid email or password".to_string()));
    }

    let token = auth.issue_token(&user.id).map_err(ApiError::Database)?;

    info!("Successfully logged in user with id: {}", user.id);

    Ok(Json(TokenResponse::new(token, &user)))
}

/// Handler for fetching the authenticated user's profile
///
/// This function handles GET requests to `/api/auth/me`.
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn me_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    debug!("Fetching current user profile");

    let user = repo::get_user(&pool, &user.user_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(UserResponse::from(&user)))
}

/// Handler for updating the authenticated user's profile
///
/// This function handles PUT requests to `/api/auth/profile`. Only the
/// display name can be changed here; stats have their own endpoint.
///
/// ### Returns
///
/// The updated user profile as JSON
///
/// ### Errors
///
/// Returns a validation error when no usable name is supplied
#[instrument(skip(pool, payload), fields(user_id = %user.user_id))]
pub async fn update_profile_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileDto>,
) -> Result<Json<UserResponse>, ApiError> {
    info!("Updating user profile");

    let name = match payload.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(ApiError::Validation("No data provided for update".to_string())),
    };

    let updated = repo::update_profile_name(&pool, &user.user_id, &name)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("User"))?;

    info!("Successfully updated profile for user: {}", updated.id);

    Ok(Json(UserResponse::from(&updated)))
}
