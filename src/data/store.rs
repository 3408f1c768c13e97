//! Storage contracts consumed by the service layer
//!
//! [`Database`](super::Database) implements both traits; tests substitute
//! mocks generated by `mockall`.

use async_trait::async_trait;

use super::models::{Match, MatchId, Member, MemberId, NewMatch};
use crate::error::AppError;

/// Member lookup
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Find a member by identity
    async fn find_member_by_id(&self, id: MemberId) -> Result<Option<Member>, AppError>;
}

/// Match persistence
///
/// Single-entity operations must be linearizable.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Persist a new match and return it with its assigned id
    async fn save(&self, new_match: NewMatch) -> Result<Match, AppError>;

    /// Find a match by id
    async fn find_match_by_id(&self, id: MatchId) -> Result<Option<Match>, AppError>;

    /// List every stored match, ordered by id
    async fn find_all_matches(&self) -> Result<Vec<Match>, AppError>;

    /// Delete `target` if it still exists with the same owner
    ///
    /// # Returns
    /// `true` if a row was removed, `false` if it was already gone.
    async fn delete(&self, target: &Match) -> Result<bool, AppError>;
}
