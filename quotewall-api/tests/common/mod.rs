/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test user creation (regular and administrator)
/// - JWT token generation
/// - API client helpers

use axum::body::Body;
use axum::http::Request;
use quotewall_api::app::{build_router, AppState};
use quotewall_api::config::Config;
use quotewall_shared::auth::jwt::{create_token, Claims, TokenType};
use quotewall_shared::models::quote::{CreateQuote, Quote};
use quotewall_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub other_user: User,
    pub admin: User,
    pub user_token: String,
    pub other_token: String,
    pub admin_token: String,
}

impl TestContext {
    /// Creates a new test context against the configured database
    pub async fn new() -> anyhow::Result<Self> {
        // Load test configuration
        let config = Config::from_env()?;

        // Connect to database
        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        // Create test users: two regular accounts and one administrator
        let user = create_test_user(&db, false).await?;
        let other_user = create_test_user(&db, false).await?;
        let admin = create_test_user(&db, true).await?;

        // Generate JWT tokens
        let user_token = token_for(&user, &config)?;
        let other_token = token_for(&other_user, &config)?;
        let admin_token = token_for(&admin, &config)?;

        // Build app
        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            other_user,
            admin,
            user_token,
            other_token,
            admin_token,
        })
    }

    /// Returns an authorization header value for the given token
    pub fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Cleans up test data
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        // Deleting users cascades to their quotes
        User::delete(&self.db, self.user.id).await?;
        User::delete(&self.db, self.other_user.id).await?;
        User::delete(&self.db, self.admin.id).await?;
        Ok(())
    }
}

/// Creates a user with a unique email; optionally flips the admin flag
pub async fn create_test_user(db: &PgPool, is_admin: bool) -> anyhow::Result<User> {
    let user = User::create(
        db,
        CreateUser {
            email: format!("test-{}@example.com", Uuid::new_v4()),
            password_hash: Some("$argon2id$test-not-a-real-hash".to_string()),
            name: Some("Test User".to_string()),
            avatar_url: None,
        },
    )
    .await?;

    if !is_admin {
        return Ok(user);
    }

    // The admin flag is never settable through the API; flip it directly
    sqlx::query("UPDATE users SET is_admin = TRUE WHERE id = $1")
        .bind(user.id)
        .execute(db)
        .await?;

    Ok(User::find_by_id(db, user.id)
        .await?
        .expect("admin user just created"))
}

/// Issues an access token for a user
pub fn token_for(user: &User, config: &Config) -> anyhow::Result<String> {
    let claims = Claims::new(user.id, user.is_admin, TokenType::Access);
    Ok(create_token(&claims, &config.jwt.secret)?)
}

/// Helper to create a quote directly in the database
pub async fn create_test_quote(
    ctx: &TestContext,
    owner_id: Uuid,
    content: &str,
    category: Option<&str>,
) -> anyhow::Result<Quote> {
    let quote = Quote::create(
        &ctx.db,
        CreateQuote {
            owner_id,
            content: content.to_string(),
            category: category.map(|c| c.to_string()),
        },
    )
    .await?;

    Ok(quote)
}

/// Builds a JSON request with an optional bearer token
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("authorization", TestContext::bearer(token));
    }

    let body = match body {
        Some(json) => Body::from(json.to_string()),
        None => Body::empty(),
    };

    builder.body(body).expect("request should build")
}

/// Reads a response body as JSON
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&body).expect("body should be JSON")
}
