/// Quote CRUD endpoints
///
/// This module provides the quote endpoints. Every route requires an
/// authenticated caller; the ownership guard decides mutations.
///
/// # Endpoints
///
/// - `GET    /v1/quotes` - List all quotes, newest first
/// - `POST   /v1/quotes` - Create quote owned by the caller
/// - `PUT    /v1/quotes/:id` - Update quote (owner only)
/// - `DELETE /v1/quotes/:id` - Delete quote (owner or admin)
/// - `GET    /v1/quotes/user/:user_id` - One user's quotes (self or admin)
///
/// # Check ordering
///
/// Mutations decide existence before ownership: a missing quote is 404 even
/// for a caller who would also have failed the guard, and a guard failure is
/// always 403 on a quote that exists. The final write is a single statement
/// conditional on `(id, owner_id)`, so a quote deleted between the probe and
/// the write surfaces as 404 rather than a silent lost update.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use quotewall_shared::{
    auth::{
        authorization::{require_ownership, require_ownership_or_admin, require_self_or_admin},
        middleware::AuthContext,
    },
    models::quote::{CreateQuote, Quote, QuoteWithAuthor, UpdateQuote},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create quote request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuoteRequest {
    /// Quote text
    #[validate(length(max = 2000, message = "Content must be at most 2000 characters"))]
    pub content: String,

    /// Category label; defaults to "motivational" when omitted
    #[validate(length(max = 50, message = "Category must be at most 50 characters"))]
    pub category: Option<String>,
}

/// Update quote request
///
/// At least one field must be present.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuoteRequest {
    /// New quote text
    #[validate(length(max = 2000, message = "Content must be at most 2000 characters"))]
    pub content: Option<String>,

    /// New category label
    #[validate(length(max = 50, message = "Category must be at most 50 characters"))]
    pub category: Option<String>,
}

/// Quote representation returned by the API
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    /// Quote ID
    pub id: String,

    /// Owning user ID
    pub owner_id: String,

    /// Quote text
    pub content: String,

    /// Category label
    pub category: String,

    /// Owner's display name (present on the denormalized listing)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,

    /// Created at
    pub created_at: DateTime<Utc>,

    /// Updated at
    pub updated_at: DateTime<Utc>,
}

impl From<Quote> for QuoteResponse {
    fn from(q: Quote) -> Self {
        Self {
            id: q.id.to_string(),
            owner_id: q.owner_id.to_string(),
            content: q.content,
            category: q.category,
            author_name: None,
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

impl From<QuoteWithAuthor> for QuoteResponse {
    fn from(q: QuoteWithAuthor) -> Self {
        Self {
            id: q.id.to_string(),
            owner_id: q.owner_id.to_string(),
            content: q.content,
            category: q.category,
            author_name: q.author_name,
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

/// List quotes response
#[derive(Debug, Serialize)]
pub struct ListQuotesResponse {
    /// Quotes, newest first
    pub quotes: Vec<QuoteResponse>,
}

/// Delete quote response
#[derive(Debug, Serialize)]
pub struct DeleteQuoteResponse {
    /// Whether the quote was deleted
    pub deleted: bool,
}

/// List all quotes
///
/// Returns every quote, newest first, each with its author's display name
/// denormalized onto the row.
///
/// # Endpoint
///
/// ```text
/// GET /v1/quotes
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `500 Internal Server Error`: Server error
pub async fn list_quotes(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
) -> ApiResult<Json<ListQuotesResponse>> {
    let quotes = Quote::list_with_authors(&state.db).await?;

    Ok(Json(ListQuotesResponse {
        quotes: quotes.into_iter().map(QuoteResponse::from).collect(),
    }))
}

/// Create a quote
///
/// The quote is owned by the caller; the category defaults when omitted.
///
/// # Endpoint
///
/// ```text
/// POST /v1/quotes
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "content": "Keep going",
///   "category": "motivational"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Blank content
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn create_quote(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateQuoteRequest>,
) -> ApiResult<Json<QuoteResponse>> {
    // Validate request
    req.validate()?;

    let content = req.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest("Content is required".to_string()));
    }

    let quote = Quote::create(
        &state.db,
        CreateQuote {
            owner_id: auth.user_id,
            content: content.to_string(),
            category: req.category,
        },
    )
    .await?;

    tracing::debug!(quote_id = %quote.id, owner_id = %auth.user_id, "Quote created");

    Ok(Json(QuoteResponse::from(quote)))
}

/// Update a quote
///
/// Owner-only; the administrator flag grants no bypass here.
///
/// # Endpoint
///
/// ```text
/// PUT /v1/quotes/:id
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "content": "Keep going, always",
///   "category": "wisdom"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Neither content nor category provided
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Caller does not own the quote
/// - `404 Not Found`: Quote does not exist
/// - `500 Internal Server Error`: Server error
pub async fn update_quote(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateQuoteRequest>,
) -> ApiResult<Json<QuoteResponse>> {
    // Validate request
    req.validate()?;

    let content = match req.content.as_deref().map(str::trim) {
        Some("") => return Err(ApiError::BadRequest("Content is required".to_string())),
        Some(c) => Some(c.to_string()),
        None => None,
    };

    let patch = UpdateQuote {
        content,
        category: req.category,
    };
    if patch.is_empty() {
        return Err(ApiError::BadRequest(
            "Content or category is required".to_string(),
        ));
    }

    // Existence first: 404 before any ownership verdict
    let existing = Quote::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quote not found".to_string()))?;

    // Owner-only; admins do not get to edit other users' quotes
    require_ownership(&auth, existing.owner_id)?;

    // Conditional write; a row that vanished since the probe is a 404
    let quote = Quote::update_owned(&state.db, id, auth.user_id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quote not found".to_string()))?;

    Ok(Json(QuoteResponse::from(quote)))
}

/// Delete a quote
///
/// Owners may delete their own quotes; administrators may delete anyone's.
///
/// # Endpoint
///
/// ```text
/// DELETE /v1/quotes/:id
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Caller is neither owner nor admin
/// - `404 Not Found`: Quote does not exist
/// - `500 Internal Server Error`: Server error
pub async fn delete_quote(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteQuoteResponse>> {
    // Existence first: 404 before any ownership verdict
    let existing = Quote::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quote not found".to_string()))?;

    require_ownership_or_admin(&auth, existing.owner_id)?;

    // Owners go through the conditional delete; the admin path is
    // unconditional since the guard already passed
    let deleted = if existing.owner_id == auth.user_id {
        Quote::delete_owned(&state.db, id, auth.user_id).await?
    } else {
        Quote::delete(&state.db, id).await?
    };

    if !deleted {
        return Err(ApiError::NotFound("Quote not found".to_string()));
    }

    tracing::debug!(quote_id = %id, user_id = %auth.user_id, "Quote deleted");

    Ok(Json(DeleteQuoteResponse { deleted: true }))
}

/// List one user's quotes
///
/// Users may list their own quotes; administrators may list anyone's.
///
/// # Endpoint
///
/// ```text
/// GET /v1/quotes/user/:user_id
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Caller is neither the named user nor admin
/// - `500 Internal Server Error`: Server error
pub async fn list_user_quotes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ListQuotesResponse>> {
    require_self_or_admin(&auth, user_id)?;

    let quotes = Quote::list_by_owner(&state.db, user_id).await?;

    Ok(Json(ListQuotesResponse {
        quotes: quotes.into_iter().map(QuoteResponse::from).collect(),
    }))
}
