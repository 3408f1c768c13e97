//! Data layer module
//!
//! Handles all data persistence:
//! - SQLite database operations
//! - Storage contracts consumed by the service layer

mod database;
mod models;
mod store;

pub use database::Database;
pub use models::*;
pub use store::{MatchStore, MemberDirectory};

#[cfg(test)]
pub(crate) use store::{MockMatchStore, MockMemberDirectory};

#[cfg(test)]
mod database_test;
