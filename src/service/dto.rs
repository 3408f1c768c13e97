//! Match request and response DTOs
//!
//! JSON field names are camelCase to stay compatible with existing clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{Match, MatchCategory, MatchId, MemberId};

/// Match creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    pub category: MatchCategory,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub location: String,
    pub scheduled_at: DateTime<Utc>,
    pub capacity: i64,
}

/// Match deletion request
///
/// Carries no identity; the caller comes from the session token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMatchRequest {
    pub match_id: MatchId,
}

/// Single match lookup request
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindMatchByIdRequest {
    pub match_id: MatchId,
}

/// Read-only projection of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub id: MatchId,
    pub category: MatchCategory,
    pub title: String,
    pub content: String,
    pub location: String,
    pub scheduled_at: DateTime<Utc>,
    pub capacity: i64,
    pub owner_id: MemberId,
}

impl From<Match> for MatchResponse {
    fn from(value: Match) -> Self {
        Self {
            id: value.id,
            category: value.category,
            title: value.title,
            content: value.content,
            location: value.location,
            scheduled_at: value.scheduled_at,
            capacity: value.capacity,
            owner_id: value.owner_id,
        }
    }
}
