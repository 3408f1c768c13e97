//! Match service
//!
//! Create, read, list and delete match listings. Deletion is restricted to
//! the member that created the listing.

use std::sync::Arc;

use chrono::Utc;

use super::dto::{CreateMatchRequest, DeleteMatchRequest, FindMatchByIdRequest, MatchResponse};
use crate::auth::Caller;
use crate::data::{Match, MatchStore, MemberDirectory, NewMatch};
use crate::error::AppError;

/// Reported when a delete targets a missing match
pub const MATCH_NOT_FOUND_MESSAGE: &str = "매치를 찾을 수 없습니다.";
/// Reported when a read targets a missing match
pub const POST_NOT_FOUND_MESSAGE: &str = "게시물이 존재하지 않습니다.";

/// Match service
pub struct MatchService {
    members: Arc<dyn MemberDirectory>,
    matches: Arc<dyn MatchStore>,
}

impl MatchService {
    /// Create new match service
    pub fn new(members: Arc<dyn MemberDirectory>, matches: Arc<dyn MatchStore>) -> Self {
        Self { members, matches }
    }

    /// Create a match owned by `caller`
    ///
    /// # Errors
    /// - `MemberNotFound` if the caller has no member record
    /// - `Validation` if the request fields are out of range
    ///
    /// Nothing is written on either failure.
    pub async fn create_match(
        &self,
        caller: &Caller,
        request: CreateMatchRequest,
    ) -> Result<Match, AppError> {
        let owner_id = caller.member_id();

        self.members
            .find_member_by_id(owner_id)
            .await?
            .ok_or(AppError::MemberNotFound)?;

        let new_match = NewMatch::new(
            owner_id,
            request.category,
            request.title,
            request.content,
            request.location,
            request.scheduled_at,
            request.capacity,
            Utc::now(),
        )?;

        let saved = self.matches.save(new_match).await?;

        tracing::info!(
            match_id = saved.id,
            owner_id,
            category = saved.category.as_str(),
            "Match created"
        );

        Ok(saved)
    }

    /// Delete a match owned by `caller`
    ///
    /// # Errors
    /// - `MatchNotFound` if the match does not exist, including when a
    ///   concurrent delete removed it first
    /// - `NotMatchOwner` if the caller did not create it
    pub async fn delete_match(
        &self,
        caller: &Caller,
        request: DeleteMatchRequest,
    ) -> Result<(), AppError> {
        let target = self
            .matches
            .find_match_by_id(request.match_id)
            .await?
            .ok_or(AppError::MatchNotFound(MATCH_NOT_FOUND_MESSAGE))?;

        if !target.is_owned_by(caller.member_id()) {
            tracing::warn!(
                match_id = target.id,
                owner_id = target.owner_id,
                caller_id = caller.member_id(),
                "Rejected delete by non-owner"
            );
            return Err(AppError::NotMatchOwner);
        }

        if !self.matches.delete(&target).await? {
            return Err(AppError::MatchNotFound(MATCH_NOT_FOUND_MESSAGE));
        }

        tracing::info!(match_id = target.id, owner_id = target.owner_id, "Match deleted");

        Ok(())
    }

    /// Get a single match
    pub async fn find_match_by_id(
        &self,
        request: FindMatchByIdRequest,
    ) -> Result<MatchResponse, AppError> {
        self.matches
            .find_match_by_id(request.match_id)
            .await?
            .map(MatchResponse::from)
            .ok_or(AppError::MatchNotFound(POST_NOT_FOUND_MESSAGE))
    }

    /// List every match
    pub async fn find_all_matches(&self) -> Result<Vec<MatchResponse>, AppError> {
        let matches = self.matches.find_all_matches().await?;
        Ok(matches.into_iter().map(MatchResponse::from).collect())
    }
}
