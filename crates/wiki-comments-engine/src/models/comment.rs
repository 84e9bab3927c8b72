use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Offset, Opcode};

/// The account a comment was posted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commenter {
    pub oauth_provider: String,
    pub oauth_user_id: String,
    pub name: String,
}

impl Commenter {
    /// Two commenters are the same person when provider and provider-side id match;
    /// the display name may have changed since.
    pub fn is_same_account(&self, other: &Commenter) -> bool {
        self.oauth_provider == other.oauth_provider && self.oauth_user_id == other.oauth_user_id
    }
}

/// A comment as returned to readers of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub offset: Offset,
    pub commenter: Commenter,
    pub comment: String,
    pub created_time: DateTime<Utc>,
    pub last_edited_time: Option<DateTime<Utc>>,
}

/// What happened to a page in a new build of the wiki.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PageChange {
    /// The page text was edited; `diff` maps old text positions to new ones.
    Modified { diff: Vec<Opcode> },
    /// The page moved to a new path with its text unchanged.
    Renamed { to: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tag;

    #[test]
    fn test_page_change_wire_format() {
        let modified: PageChange = serde_json::from_str(
            r#"{"type": "modified", "diff": [{"tag": "insert", "i1": 5, "i2": 5, "j1": 5, "j2": 10}]}"#,
        )
        .unwrap();
        assert_eq!(
            modified,
            PageChange::Modified {
                diff: vec![Opcode { tag: Tag::Insert, i1: 5, i2: 5, j1: 5, j2: 10 }]
            }
        );

        let renamed: PageChange =
            serde_json::from_str(r#"{"type": "renamed", "to": "/graph/dfs/"}"#).unwrap();
        assert_eq!(renamed, PageChange::Renamed { to: "/graph/dfs/".to_string() });
    }

    #[test]
    fn test_same_account_ignores_display_name() {
        let a = Commenter {
            oauth_provider: "github".to_string(),
            oauth_user_id: "42".to_string(),
            name: "old name".to_string(),
        };
        let b = Commenter { name: "new name".to_string(), ..a.clone() };
        let c = Commenter { oauth_user_id: "43".to_string(), ..a.clone() };

        assert!(a.is_same_account(&b));
        assert!(!a.is_same_account(&c));
    }
}
