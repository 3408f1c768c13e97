//! Service layer
//!
//! Contains business logic separated from HTTP handlers.
//! Services orchestrate member lookups and match storage.

mod dto;
mod match_service;

pub use dto::{CreateMatchRequest, DeleteMatchRequest, FindMatchByIdRequest, MatchResponse};
pub use match_service::{MATCH_NOT_FOUND_MESSAGE, MatchService, POST_NOT_FOUND_MESSAGE};
