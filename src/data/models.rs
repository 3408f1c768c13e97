//! Data models
//!
//! Rust structs representing database entities.
//! Entities use SQLite row ids for identity and chrono for timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

// =============================================================================
// ID Types
// =============================================================================

/// Numeric member identity
pub type MemberId = i64;

/// Numeric match identity
pub type MatchId = i64;

// =============================================================================
// Member
// =============================================================================

/// A registered member
///
/// Registered on first GitHub login; `id` never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Member {
    pub id: MemberId,
    /// GitHub numeric user id
    pub github_id: i64,
    /// GitHub login at last sign-in
    pub login: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Match
// =============================================================================

/// Listing type of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchCategory {
    /// Looking for an opposing team
    Matching,
    /// Looking for individual substitute players
    Mercenary,
    /// Recruiting permanent team members
    TeamRecruit,
}

impl MatchCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matching => "MATCHING",
            Self::Mercenary => "MERCENARY",
            Self::TeamRecruit => "TEAM_RECRUIT",
        }
    }
}

/// A persisted match listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    pub id: MatchId,
    pub category: MatchCategory,
    pub title: String,
    pub content: String,
    pub location: String,
    pub scheduled_at: DateTime<Utc>,
    /// Maximum number of participants
    pub capacity: i64,
    /// Member that created the listing
    pub owner_id: MemberId,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// Check whether `member_id` owns this match
    pub fn is_owned_by(&self, member_id: MemberId) -> bool {
        self.owner_id == member_id
    }
}

/// A validated match that has not been stored yet
///
/// Only obtainable through [`NewMatch::new`], so every value that reaches a
/// store already satisfies the field constraints and has its owner fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    category: MatchCategory,
    title: String,
    content: String,
    location: String,
    scheduled_at: DateTime<Utc>,
    capacity: i64,
    owner_id: MemberId,
    created_at: DateTime<Utc>,
}

impl NewMatch {
    /// Validate fields and bind the match to its owner
    ///
    /// # Errors
    /// `AppError::Validation` when the title is blank, the capacity is not
    /// positive, or `scheduled_at` is not after `now`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner_id: MemberId,
        category: MatchCategory,
        title: String,
        content: String,
        location: String,
        scheduled_at: DateTime<Utc>,
        capacity: i64,
        now: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        if title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_string()));
        }

        if capacity <= 0 {
            return Err(AppError::Validation(
                "capacity must be greater than 0".to_string(),
            ));
        }

        if scheduled_at <= now {
            return Err(AppError::Validation(
                "scheduledAt must be in the future".to_string(),
            ));
        }

        Ok(Self {
            category,
            title,
            content,
            location,
            scheduled_at,
            capacity,
            owner_id,
            created_at: now,
        })
    }

    pub fn owner_id(&self) -> MemberId {
        self.owner_id
    }

    pub fn category(&self) -> MatchCategory {
        self.category
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn scheduled_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Attach a store-assigned id
    pub fn into_match(self, id: MatchId) -> Match {
        Match {
            id,
            category: self.category,
            title: self.title,
            content: self.content,
            location: self.location,
            scheduled_at: self.scheduled_at,
            capacity: self.capacity,
            owner_id: self.owner_id,
            created_at: self.created_at,
        }
    }
}
