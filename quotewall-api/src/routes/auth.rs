/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration (JSON, or multipart form with an avatar image)
/// - Login
/// - Token refresh
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user
/// - `POST /v1/auth/login` - Login and get tokens
/// - `POST /v1/auth/refresh` - Refresh access token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    routes::users::UserResponse,
};
use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use quotewall_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;
use validator::Validate;

/// Register request (JSON body; the multipart form carries the same fields)
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional display name
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    /// Optional avatar URL (JSON registrations cannot upload a file)
    #[validate(url(message = "Avatar URL must be a valid URL"))]
    pub avatar_url: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// The created user (password hash never serialized)
    pub user: UserResponse,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// User ID
    pub user_id: String,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Register a new user
///
/// Accepts either a JSON body or a multipart form. The multipart variant may
/// include an `avatar` image file (max 5 MiB), stored under the configured
/// uploads directory.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "hunter2hunter2",
///   "name": "John Doe"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "user": { "id": "uuid", "email": "user@example.com", ... },
///   "access_token": "eyJ...",
///   "refresh_token": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body or non-image avatar
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    request: Request,
) -> ApiResult<Json<RegisterResponse>> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("multipart/form-data"))
        .unwrap_or(false);

    let (req, avatar_upload) = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?;
        parse_register_form(multipart, state.config.uploads.max_bytes).await?
    } else {
        let Json(body) = Json::<RegisterRequest>::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?;
        (body, None)
    };

    // Validate request
    req.validate()?;

    // Hash password
    let password_hash = password::hash_password(&req.password)?;

    // Persist the uploaded avatar, if any; a storage failure downgrades to
    // registration without an avatar rather than losing the account
    let avatar_url = match avatar_upload {
        Some(upload) => match store_avatar(&state.config.uploads.dir, &upload).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Avatar upload failed, continuing without: {}", e);
                None
            }
        },
        None => req.avatar_url.clone(),
    };

    // Create user (duplicate email surfaces as a unique violation -> 409)
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email.clone(),
            password_hash: Some(password_hash),
            name: req.name.clone(),
            avatar_url,
        },
    )
    .await?;

    // Generate tokens
    let access_claims = jwt::Claims::new(user.id, user.is_admin, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, user.is_admin, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(RegisterResponse {
        user: UserResponse::from(user),
        access_token,
        refresh_token,
    }))
}

/// Login endpoint
///
/// Authenticates a user and returns JWT tokens. Accounts without a password
/// hash cannot log in this way.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "hunter2hunter2"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    // Validate request
    req.validate()?;

    // Find user by email
    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    // Accounts provisioned without a credential have no hash
    let password_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    // Verify password
    let valid = password::verify_password(&req.password, password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    // Update last login
    User::update_last_login(&state.db, user.id).await?;

    // Generate tokens
    let access_claims = jwt::Claims::new(user.id, user.is_admin, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, user.is_admin, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        user_id: user.id.to_string(),
        access_token,
        refresh_token,
    }))
}

/// Token refresh endpoint
///
/// Exchanges a refresh token for a new access token.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/refresh
/// Content-Type: application/json
///
/// {
///   "refresh_token": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired refresh token
/// - `500 Internal Server Error`: Server error
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}

/// An avatar image lifted out of a multipart form
struct AvatarUpload {
    data: Vec<u8>,
    extension: String,
}

/// Parses the multipart registration form
///
/// Accepts the same text fields as the JSON body plus an optional `avatar`
/// file. The file must be an image and at most `max_bytes` large.
async fn parse_register_form(
    mut multipart: Multipart,
    max_bytes: usize,
) -> ApiResult<(RegisterRequest, Option<AvatarUpload>)> {
    let mut email = None;
    let mut password = None;
    let mut name = None;
    let mut avatar = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart field: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string());
        match field_name.as_deref() {
            Some("email") => {
                email = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Invalid email field: {}", e))
                })?);
            }
            Some("password") => {
                password = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Invalid password field: {}", e))
                })?);
            }
            Some("name") => {
                name = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Invalid name field: {}", e))
                })?);
            }
            Some("avatar") => {
                let is_image = field
                    .content_type()
                    .map(|ct| ct.starts_with("image/"))
                    .unwrap_or(false);
                if !is_image {
                    return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
                        field: "avatar".to_string(),
                        message: "Avatar must be an image file".to_string(),
                    }]));
                }

                let extension = field
                    .file_name()
                    .and_then(|f| FsPath::new(f).extension().and_then(|e| e.to_str()))
                    .unwrap_or("png")
                    .to_string();

                let data = field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("Invalid avatar field: {}", e))
                })?;

                if data.len() > max_bytes {
                    return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
                        field: "avatar".to_string(),
                        message: "Avatar size must be less than 5MB".to_string(),
                    }]));
                }

                // Empty file inputs are treated as "no avatar"
                if !data.is_empty() {
                    avatar = Some(AvatarUpload {
                        data: data.to_vec(),
                        extension,
                    });
                }
            }
            _ => {}
        }
    }

    let email =
        email.ok_or_else(|| ApiError::BadRequest("Email and password are required".to_string()))?;
    let password = password
        .ok_or_else(|| ApiError::BadRequest("Email and password are required".to_string()))?;

    Ok((
        RegisterRequest {
            email,
            password,
            name,
            avatar_url: None,
        },
        avatar,
    ))
}

/// Writes an uploaded avatar to the uploads directory
///
/// Returns the public path for the stored file. Filenames carry random
/// entropy plus a timestamp so concurrent uploads never collide.
async fn store_avatar(uploads_dir: &str, upload: &AvatarUpload) -> anyhow::Result<String> {
    tokio::fs::create_dir_all(uploads_dir).await?;

    let random_id: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    let filename = format!(
        "avatar-{}-{}.{}",
        random_id,
        chrono::Utc::now().timestamp_millis(),
        upload.extension
    );

    let filepath = FsPath::new(uploads_dir).join(&filename);
    tokio::fs::write(&filepath, &upload.data).await?;

    tracing::debug!(path = %filepath.display(), "Avatar stored");

    Ok(format!("/uploads/{}", filename))
}
