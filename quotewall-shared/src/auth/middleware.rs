/// Authentication middleware support for Axum
///
/// This module provides the identity-resolution types used by the API
/// server's JWT middleware. The middleware extracts credentials from
/// requests, validates them, and adds an [`AuthContext`] to request
/// extensions; handlers receive the caller's identity explicitly instead of
/// reading any global session state.
///
/// # Request Extensions
///
/// After successful authentication, middleware adds:
/// - `AuthContext`: Contains user_id and the administrator flag
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use quotewall_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;

/// Authentication context added to request extensions
///
/// This struct is added to the request after successful authentication.
/// Handlers extract it using Axum's `Extension` extractor. A request that
/// never passes the auth layer simply has no `AuthContext` - anonymous is a
/// valid outcome, not an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Whether the user holds the administrator flag
    pub is_admin: bool,
}

impl AuthContext {
    /// Creates auth context from validated JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            is_admin: claims.is_admin,
        }
    }
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenType;

    #[test]
    fn test_auth_context_from_claims() {
        let claims = Claims::new(Uuid::new_v4(), true, TokenType::Access);
        let auth = AuthContext::from_claims(&claims);

        assert_eq!(auth.user_id, claims.sub);
        assert!(auth.is_admin);
    }
}
