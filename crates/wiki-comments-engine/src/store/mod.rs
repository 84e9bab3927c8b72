/*!
 * # Comment Store
 *
 * In-memory model of everything the comment service persists: pages, the
 * anchors on each page, the comments on each anchor, and the commit hash of
 * the wiki build the anchors refer to.
 *
 * The store is the collaborator that feeds the remapper. It keeps every
 * page's anchors sorted and disjoint, so [`crate::remap::remap_offsets`] can be
 * run on them directly when a new build reports a page change, and it applies
 * the resulting replacements: moved anchors keep their comments, dropped
 * anchors take their comments with them.
 *
 * The whole store serializes with serde; see [`crate::io`] for the JSON file
 * format used by the CLI.
 */

mod page;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    Comment, Commenter, EditOp, EditOpError, Offset, PageChange, Replacement, edits_from_opcodes,
};
use crate::remap::{RemapError, check_preconditions, remap_offsets};
use crate::validation::{
    ValidationError, validate_comment, validate_commit_hash, validate_diff, validate_offset,
    validate_path,
};
use page::{Anchor, Page, Slot, StoredComment};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid diff: {0}")]
    EditOp(#[from] EditOpError),
    #[error("Cannot remap anchors: {0}")]
    Remap(#[from] RemapError),
    #[error("Commit hash mismatch, the page was rendered from a different build")]
    CommitHashMismatch,
    #[error("Page not found: {0}")]
    PageNotFound(String),
    #[error("Comment not found: {0}")]
    CommentNotFound(u64),
    #[error("Comment {0} belongs to another account")]
    NotAuthor(u64),
    #[error("Offset {}..{} overlaps the existing anchor {}..{}", .offset.start, .offset.end, .existing.start, .existing.end)]
    OverlappingAnchor { offset: Offset, existing: Offset },
    #[error("Cannot rename {0} to itself")]
    SamePath(String),
    #[error("Path already exists: {0}")]
    PathExists(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentStore {
    commit_hash: Option<String>,
    last_comment_id: u64,
    pages: BTreeMap<String, Page>,
}

impl CommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit_hash(&self) -> Option<&str> {
        self.commit_hash.as_deref()
    }

    pub fn set_commit_hash(&mut self, hash: &str) -> Result<(), StoreError> {
        validate_commit_hash(hash)?;
        self.commit_hash = Some(hash.to_string());
        Ok(())
    }

    pub fn matches_commit_hash(&self, hash: &str) -> bool {
        self.commit_hash.as_deref() == Some(hash)
    }

    /// All page paths that have ever had a comment.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.pages.contains_key(path)
    }

    /// Current anchor offsets of a page, sorted by start.
    pub fn offsets(&self, path: &str) -> Vec<Offset> {
        self.pages.get(path).map(Page::offsets).unwrap_or_default()
    }

    /// Post a comment on `offset` of the page at `path`.
    ///
    /// `commit_hash` is the build the reader saw. Offsets from any other build
    /// may point at different text, so the comment is refused.
    pub fn post_comment(
        &mut self,
        path: &str,
        offset: Offset,
        commenter: Commenter,
        comment: &str,
        commit_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        validate_path(path)?;
        validate_offset(offset)?;
        validate_comment(comment)?;
        validate_commit_hash(commit_hash)?;

        if !self.matches_commit_hash(commit_hash) {
            return Err(StoreError::CommitHashMismatch);
        }

        let page = self.pages.entry(path.to_string()).or_default();
        let index = match page.slot_for(offset) {
            Slot::Existing(index) => index,
            Slot::Vacant(index) => {
                page.anchors.insert(index, Anchor { offset, comments: Vec::new() });
                index
            }
            Slot::Conflict(existing) => {
                return Err(StoreError::OverlappingAnchor { offset, existing });
            }
        };

        self.last_comment_id += 1;
        let id = self.last_comment_id;
        page.anchors[index].comments.push(StoredComment {
            id,
            commenter,
            comment: comment.to_string(),
            created_time: now,
            last_edited_time: None,
        });

        log::debug!("posted comment {id} on {path} at {}..{}", offset.start, offset.end);
        Ok(id)
    }

    /// Comments of a page, ordered by anchor position then by id.
    pub fn comments(&self, path: &str) -> Vec<Comment> {
        let Some(page) = self.pages.get(path) else {
            return Vec::new();
        };

        page.anchors
            .iter()
            .flat_map(|anchor| {
                anchor.comments.iter().map(move |stored| Comment {
                    id: stored.id,
                    offset: anchor.offset,
                    commenter: stored.commenter.clone(),
                    comment: stored.comment.clone(),
                    created_time: stored.created_time,
                    last_edited_time: stored.last_edited_time,
                })
            })
            .collect()
    }

    /// Replace the text of a comment. Only its author may do so.
    pub fn edit_comment(
        &mut self,
        id: u64,
        requester: &Commenter,
        comment: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        validate_comment(comment)?;

        let (_, page, anchor, index) = self.find_comment_mut(id)?;
        let stored = &mut page.anchors[anchor].comments[index];
        if !stored.commenter.is_same_account(requester) {
            return Err(StoreError::NotAuthor(id));
        }

        stored.comment = comment.to_string();
        stored.last_edited_time = Some(now);
        Ok(())
    }

    /// Delete one comment on behalf of its author. An anchor left without
    /// comments goes with it.
    pub fn delete_comment(&mut self, id: u64, requester: &Commenter) -> Result<(), StoreError> {
        let (path, page, anchor, index) = self.find_comment_mut(id)?;
        if !page.anchors[anchor].comments[index].commenter.is_same_account(requester) {
            return Err(StoreError::NotAuthor(id));
        }

        page.anchors[anchor].comments.remove(index);
        if page.anchors[anchor].comments.is_empty() {
            let removed = page.anchors.remove(anchor);
            log::debug!("removed empty anchor {:?} on {path}", removed.offset);
        }
        Ok(())
    }

    /// Relocate a page's anchors after its text was edited.
    ///
    /// Returns one replacement per anchor that existed before the edit.
    pub fn modify_page(
        &mut self,
        path: &str,
        ops: &[EditOp],
    ) -> Result<Vec<Replacement>, StoreError> {
        let page = self
            .pages
            .get_mut(path)
            .ok_or_else(|| StoreError::PageNotFound(path.to_string()))?;

        if page.anchors.is_empty() {
            return Ok(Vec::new());
        }

        let offsets = page.offsets();
        check_preconditions(&offsets, ops)?;

        let replacements = remap_offsets(&offsets, ops);
        let removed = page.apply(&replacements);

        log::info!(
            "remapped {} anchor(s) on {path}: {} dropped, {removed} comment(s) removed",
            replacements.len(),
            replacements.iter().filter(|r| r.is_dropped()).count(),
        );
        Ok(replacements)
    }

    /// Move a page's comments to a new path. Renaming a page nobody has
    /// commented on is a no-op.
    pub fn rename_page(&mut self, from: &str, to: &str) -> Result<(), StoreError> {
        if from == to {
            return Err(StoreError::SamePath(from.to_string()));
        }
        validate_path(to)?;

        if !self.pages.contains_key(from) {
            return Ok(());
        }
        if self.pages.contains_key(to) {
            return Err(StoreError::PathExists(to.to_string()));
        }

        if let Some(page) = self.pages.remove(from) {
            self.pages.insert(to.to_string(), page);
            log::info!("renamed {from} to {to}");
        }
        Ok(())
    }

    /// Apply a change reported by a new build of the wiki.
    pub fn apply_change(
        &mut self,
        path: &str,
        change: &PageChange,
    ) -> Result<Vec<Replacement>, StoreError> {
        match change {
            PageChange::Modified { diff } => {
                validate_diff(diff)?;
                let ops = edits_from_opcodes(diff.iter().copied())?;
                self.modify_page(path, &ops)
            }
            PageChange::Renamed { to } => {
                self.rename_page(path, to)?;
                Ok(Vec::new())
            }
        }
    }

    /// Locate a comment as (page path, page, anchor index, comment index).
    fn find_comment_mut(
        &mut self,
        id: u64,
    ) -> Result<(&str, &mut Page, usize, usize), StoreError> {
        for (path, page) in self.pages.iter_mut() {
            let found = page.anchors.iter().enumerate().find_map(|(anchor_index, anchor)| {
                let index = anchor.comments.iter().position(|c| c.id == id)?;
                Some((anchor_index, index))
            });
            if let Some((anchor_index, index)) = found {
                return Ok((path.as_str(), page, anchor_index, index));
            }
        }
        Err(StoreError::CommentNotFound(id))
    }
}
