/// Quote model and database operations
///
/// This module provides the Quote model, the core entity of QuoteWall.
/// Quotes belong to exactly one user and are removed when their owner is
/// deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE quotes (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     content TEXT NOT NULL,
///     category VARCHAR(50) NOT NULL DEFAULT 'motivational',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Concurrency
///
/// Mutations by owners are single conditional statements keyed on
/// `(id, owner_id)` and report success through the affected-row count, so an
/// update can never clobber a quote the caller stopped owning between the
/// existence probe and the write.
///
/// # Example
///
/// ```no_run
/// use quotewall_shared::models::quote::{CreateQuote, Quote};
/// use quotewall_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let quote = Quote::create(&pool, CreateQuote {
///     owner_id: Uuid::new_v4(),
///     content: "Keep going".to_string(),
///     category: None,
/// }).await?;
///
/// let all = Quote::list_with_authors(&pool).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Category applied when a quote is created without one
pub const DEFAULT_CATEGORY: &str = "motivational";

/// Quote model representing a single quote record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Quote {
    /// Unique quote ID (UUID v4)
    pub id: Uuid,

    /// User who owns the quote
    pub owner_id: Uuid,

    /// Quote text
    pub content: String,

    /// Category label (e.g., "motivational", "wisdom")
    pub category: String,

    /// When the quote was created
    pub created_at: DateTime<Utc>,

    /// When the quote was last updated
    pub updated_at: DateTime<Utc>,
}

/// Quote joined with its owner's display name
///
/// The listing endpoints denormalize the author name so clients never make a
/// second request per row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuoteWithAuthor {
    /// Unique quote ID
    pub id: Uuid,

    /// User who owns the quote
    pub owner_id: Uuid,

    /// Quote text
    pub content: String,

    /// Category label
    pub category: String,

    /// Owner's display name (None if the owner never set one)
    pub author_name: Option<String>,

    /// When the quote was created
    pub created_at: DateTime<Utc>,

    /// When the quote was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuote {
    /// User who will own the quote
    pub owner_id: Uuid,

    /// Quote text
    pub content: String,

    /// Category label; [`DEFAULT_CATEGORY`] when None
    pub category: Option<String>,
}

/// Input for updating a quote
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateQuote {
    /// New quote text
    pub content: Option<String>,

    /// New category label
    pub category: Option<String>,
}

impl UpdateQuote {
    /// True when the patch carries no changes at all
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.category.is_none()
    }
}

impl Quote {
    /// Creates a new quote
    ///
    /// The category defaults to [`DEFAULT_CATEGORY`] when omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist (foreign key violation)
    /// or the database operation fails
    pub async fn create(pool: &PgPool, data: CreateQuote) -> Result<Self, sqlx::Error> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes (owner_id, content, category)
            VALUES ($1, $2, $3)
            RETURNING id, owner_id, content, category, created_at, updated_at
            "#,
        )
        .bind(data.owner_id)
        .bind(data.content)
        .bind(data.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()))
        .fetch_one(pool)
        .await?;

        Ok(quote)
    }

    /// Finds a quote by ID
    ///
    /// # Returns
    ///
    /// The quote if found, None otherwise
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            SELECT id, owner_id, content, category, created_at, updated_at
            FROM quotes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(quote)
    }

    /// Lists all quotes, newest first, with denormalized author names
    pub async fn list_with_authors(pool: &PgPool) -> Result<Vec<QuoteWithAuthor>, sqlx::Error> {
        let quotes = sqlx::query_as::<_, QuoteWithAuthor>(
            r#"
            SELECT q.id, q.owner_id, q.content, q.category, u.name AS author_name,
                   q.created_at, q.updated_at
            FROM quotes q
            JOIN users u ON u.id = q.owner_id
            ORDER BY q.created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(quotes)
    }

    /// Lists one user's quotes, newest first
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let quotes = sqlx::query_as::<_, Quote>(
            r#"
            SELECT id, owner_id, content, category, created_at, updated_at
            FROM quotes
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(quotes)
    }

    /// Updates a quote, conditional on ownership
    ///
    /// Executes a single `UPDATE ... WHERE id = $1 AND owner_id = $2` so the
    /// ownership check and the write are one atomic statement. Only non-None
    /// fields in `data` are written; `updated_at` is always bumped.
    ///
    /// # Returns
    ///
    /// The updated quote, or None when no row matched - either the quote is
    /// gone or the caller no longer owns it
    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdateQuote,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE quotes SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.content.is_some() {
            bind_count += 1;
            query.push_str(&format!(", content = ${}", bind_count));
        }
        if data.category.is_some() {
            bind_count += 1;
            query.push_str(&format!(", category = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND owner_id = $2 RETURNING id, owner_id, content, category, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Quote>(&query).bind(id).bind(owner_id);

        if let Some(content) = data.content {
            q = q.bind(content);
        }
        if let Some(category) = data.category {
            q = q.bind(category);
        }

        let quote = q.fetch_optional(pool).await?;

        Ok(quote)
    }

    /// Deletes a quote, conditional on ownership
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false when the quote is gone or the caller
    /// does not own it
    pub async fn delete_owned(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a quote unconditionally
    ///
    /// The administrator path; callers must have already passed the
    /// owner-or-admin guard.
    ///
    /// # Returns
    ///
    /// True if quote was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts quotes owned by a user
    pub async fn count_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM quotes WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_category() {
        assert_eq!(DEFAULT_CATEGORY, "motivational");
    }

    #[test]
    fn test_update_quote_is_empty() {
        assert!(UpdateQuote::default().is_empty());

        let patch = UpdateQuote {
            content: Some("new text".to_string()),
            category: None,
        };
        assert!(!patch.is_empty());

        let patch = UpdateQuote {
            content: None,
            category: Some("wisdom".to_string()),
        };
        assert!(!patch.is_empty());
    }
}
