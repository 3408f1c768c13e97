//! Database tests

use super::*;
use chrono::{Duration, Utc};
use tempfile::TempDir;

/// Helper to create a test database
async fn create_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = Database::connect(&db_path).await.unwrap();
    (db, temp_dir)
}

fn sample_match(owner_id: MemberId, title: &str) -> NewMatch {
    let now = Utc::now();
    NewMatch::new(
        owner_id,
        MatchCategory::Matching,
        title.to_string(),
        "매치 내용".to_string(),
        "부산시 해운대구".to_string(),
        now + Duration::days(2),
        8,
        now,
    )
    .unwrap()
}

#[tokio::test]
async fn test_database_connection() {
    let (_db, _temp_dir) = create_test_db().await;
}

#[tokio::test]
async fn test_database_creates_missing_parent_directory() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("dir").join("test.db");

    let db = Database::connect(&db_path).await.unwrap();
    assert!(db.get_all_matches().await.unwrap().is_empty());
    assert!(db_path.exists());
}

#[tokio::test]
async fn test_member_upsert_keeps_id() {
    let (db, _temp_dir) = create_test_db().await;

    let first = db.upsert_github_member(4242, "octocat").await.unwrap();
    let second = db.upsert_github_member(4242, "octocat-renamed").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.login, "octocat-renamed");

    let found = db.find_member_by_id(first.id).await.unwrap().unwrap();
    assert_eq!(found.github_id, 4242);
    assert_eq!(found.login, "octocat-renamed");

    assert!(db.find_member_by_id(first.id + 100).await.unwrap().is_none());
}

#[tokio::test]
async fn test_match_crud() {
    let (db, _temp_dir) = create_test_db().await;
    let member = db.upsert_github_member(1, "owner").await.unwrap();

    let pending = sample_match(member.id, "새로운 매치");
    let expected_schedule = pending.scheduled_at();

    let saved = db.save(pending).await.unwrap();
    assert!(saved.id > 0);
    assert_eq!(saved.owner_id, member.id);

    let retrieved = db.find_match_by_id(saved.id).await.unwrap().unwrap();
    assert_eq!(retrieved.title, "새로운 매치");
    assert_eq!(retrieved.category, MatchCategory::Matching);
    assert_eq!(retrieved.capacity, 8);
    assert_eq!(retrieved.scheduled_at, expected_schedule);

    assert!(db.delete(&retrieved).await.unwrap());
    assert!(db.find_match_by_id(saved.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_all_matches_ordered_by_id() {
    let (db, _temp_dir) = create_test_db().await;
    assert!(db.find_all_matches().await.unwrap().is_empty());

    let member = db.upsert_github_member(1, "owner").await.unwrap();
    let first = db.save(sample_match(member.id, "first")).await.unwrap();
    let second = db.save(sample_match(member.id, "second")).await.unwrap();

    let all = db.find_all_matches().await.unwrap();
    let ids: Vec<MatchId> = all.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[tokio::test]
async fn test_second_delete_reports_missing_row() {
    let (db, _temp_dir) = create_test_db().await;
    let member = db.upsert_github_member(1, "owner").await.unwrap();
    let saved = db.save(sample_match(member.id, "race")).await.unwrap();

    let (first, second) = tokio::join!(db.delete(&saved), db.delete(&saved));
    let outcomes = [first.unwrap(), second.unwrap()];

    assert_eq!(outcomes.iter().filter(|deleted| **deleted).count(), 1);
    assert!(db.find_match_by_id(saved.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_requires_matching_owner() {
    let (db, _temp_dir) = create_test_db().await;
    let owner = db.upsert_github_member(1, "owner").await.unwrap();
    let saved = db.save(sample_match(owner.id, "owned")).await.unwrap();

    assert!(!db.delete_match_owned_by(saved.id, owner.id + 1).await.unwrap());
    assert!(db.find_match_by_id(saved.id).await.unwrap().is_some());
}
