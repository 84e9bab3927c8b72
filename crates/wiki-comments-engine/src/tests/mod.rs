use chrono::{DateTime, TimeZone, Utc};

use crate::models::Commenter;
use crate::store::CommentStore;

pub const COMMIT_HASH: &str = "9d3f1b2";

/// A GitHub commenter with the given user id
pub fn commenter(user_id: &str) -> Commenter {
    Commenter {
        oauth_provider: "github".to_string(),
        oauth_user_id: user_id.to_string(),
        name: format!("user-{user_id}"),
    }
}

/// A fixed point in time, `minutes` after the first test timestamp
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

/// An empty store already pinned to [`COMMIT_HASH`]
pub fn create_test_store() -> CommentStore {
    let mut store = CommentStore::new();
    store.set_commit_hash(COMMIT_HASH).unwrap();
    store
}
