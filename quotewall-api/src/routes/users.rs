/// Account management endpoints
///
/// This module provides endpoints for the authenticated user's own account:
/// profile retrieval, profile updates, and account deletion.
///
/// # Endpoints
///
/// - `GET    /v1/users/me` - Caller's profile with quote count
/// - `PUT    /v1/users/profile` - Update name/email
/// - `DELETE /v1/users` - Delete account and all owned quotes

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use quotewall_shared::{
    auth::middleware::AuthContext,
    models::{
        quote::Quote,
        user::{UpdateUser, User},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// User representation returned by the API
///
/// The password hash never leaves the database layer's model, and this DTO
/// doesn't even carry the field.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID
    pub id: String,

    /// Email address
    pub email: String,

    /// Display name
    pub name: Option<String>,

    /// Avatar URL
    pub avatar_url: Option<String>,

    /// Administrator flag
    pub is_admin: bool,

    /// Created at
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id.to_string(),
            email: u.email,
            name: u.name,
            avatar_url: u.avatar_url,
            is_admin: u.is_admin,
            created_at: u.created_at,
        }
    }
}

/// Profile response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// The caller's account
    pub user: UserResponse,

    /// Number of quotes the caller owns
    pub quote_count: i64,
}

/// Update profile request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,

    /// New email address
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

/// Update profile response
#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    /// The updated account
    pub user: UserResponse,
}

/// Delete account response
#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    /// Whether the account was deleted
    pub deleted: bool,
}

/// Get the caller's profile
///
/// # Endpoint
///
/// ```text
/// GET /v1/users/me
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `404 Not Found`: Account no longer exists
/// - `500 Internal Server Error`: Server error
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ProfileResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let quote_count = Quote::count_by_owner(&state.db, auth.user_id).await?;

    Ok(Json(ProfileResponse {
        user: UserResponse::from(user),
        quote_count,
    }))
}

/// Update the caller's profile
///
/// Updates name and email with format and uniqueness validation.
///
/// # Endpoint
///
/// ```text
/// PUT /v1/users/profile
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "name": "Jane Doe",
///   "email": "jane@example.com"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `404 Not Found`: Account no longer exists
/// - `409 Conflict`: Email already taken by another account
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UpdateProfileResponse>> {
    // Validate request
    req.validate()?;

    let name = req.name.trim().to_string();
    let email = req.email.trim().to_string();

    // Uniqueness probe; the unique index still backstops a racing claim
    if User::email_taken_by_other(&state.db, &email, auth.user_id).await? {
        return Err(ApiError::Conflict("Email already in use".to_string()));
    }

    let user = User::update(
        &state.db,
        auth.user_id,
        UpdateUser {
            email: Some(email),
            name: Some(name),
            avatar_url: None,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %auth.user_id, "Profile updated");

    Ok(Json(UpdateProfileResponse {
        user: UserResponse::from(user),
    }))
}

/// Delete the caller's account
///
/// Removes the account; every owned quote goes with it via the cascading
/// foreign key. Bearer tokens are client-held, so there is no server-side
/// session to clear - clients discard their tokens.
///
/// # Endpoint
///
/// ```text
/// DELETE /v1/users
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `404 Not Found`: Account no longer exists
/// - `500 Internal Server Error`: Server error
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<DeleteAccountResponse>> {
    let deleted = User::delete(&state.db, auth.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %auth.user_id, "Account deleted");

    Ok(Json(DeleteAccountResponse { deleted: true }))
}
