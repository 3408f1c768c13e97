//! SQLite database operations
//!
//! All database access goes through this module.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;

use super::models::*;
use super::store::{MatchStore, MemberDirectory};
use crate::error::AppError;

const MATCH_COLUMNS: &str = "id, category, title, content, location, scheduled_at, capacity, owner_id, created_at";

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let connection_string = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&connection_string).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!(path = %path.display(), "Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Get member by ID
    pub async fn get_member(&self, id: MemberId) -> Result<Option<Member>, AppError> {
        let member = sqlx::query_as::<_, Member>(
            "SELECT id, github_id, login, created_at FROM members WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    /// Register a GitHub user, or refresh the login of an existing one
    ///
    /// The member id is assigned on first sign-in and kept afterwards.
    pub async fn upsert_github_member(
        &self,
        github_id: i64,
        login: &str,
    ) -> Result<Member, AppError> {
        sqlx::query(
            r#"
            INSERT INTO members (github_id, login, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(github_id) DO UPDATE SET login = excluded.login
            "#,
        )
        .bind(github_id)
        .bind(login)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let member = sqlx::query_as::<_, Member>(
            "SELECT id, github_id, login, created_at FROM members WHERE github_id = ?",
        )
        .bind(github_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    // =========================================================================
    // Matches
    // =========================================================================

    /// Insert a new match
    pub async fn insert_match(&self, new_match: NewMatch) -> Result<Match, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO matches (
                category, title, content, location, scheduled_at,
                capacity, owner_id, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new_match.category())
        .bind(new_match.title())
        .bind(new_match.content())
        .bind(new_match.location())
        .bind(new_match.scheduled_at())
        .bind(new_match.capacity())
        .bind(new_match.owner_id())
        .bind(new_match.created_at())
        .execute(&self.pool)
        .await?;

        Ok(new_match.into_match(result.last_insert_rowid()))
    }

    /// Get match by ID
    pub async fn get_match(&self, id: MatchId) -> Result<Option<Match>, AppError> {
        let query = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?");
        let found = sqlx::query_as::<_, Match>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found)
    }

    /// Get all matches ordered by ID
    pub async fn get_all_matches(&self) -> Result<Vec<Match>, AppError> {
        let query = format!("SELECT {MATCH_COLUMNS} FROM matches ORDER BY id ASC");
        let matches = sqlx::query_as::<_, Match>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(matches)
    }

    /// Delete a match if it still belongs to `owner_id`
    ///
    /// Compare-and-delete in one statement, so of two racing deletes only
    /// one observes an affected row.
    ///
    /// # Returns
    /// `true` if deleted, `false` if no matching row existed.
    pub async fn delete_match_owned_by(
        &self,
        id: MatchId,
        owner_id: MemberId,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM matches WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl MemberDirectory for Database {
    async fn find_member_by_id(&self, id: MemberId) -> Result<Option<Member>, AppError> {
        self.get_member(id).await
    }
}

#[async_trait]
impl MatchStore for Database {
    async fn save(&self, new_match: NewMatch) -> Result<Match, AppError> {
        self.insert_match(new_match).await
    }

    async fn find_match_by_id(&self, id: MatchId) -> Result<Option<Match>, AppError> {
        self.get_match(id).await
    }

    async fn find_all_matches(&self) -> Result<Vec<Match>, AppError> {
        self.get_all_matches().await
    }

    async fn delete(&self, target: &Match) -> Result<bool, AppError> {
        self.delete_match_owned_by(target.id, target.owner_id).await
    }
}
