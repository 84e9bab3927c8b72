use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Commenter, Offset, Replacement};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredComment {
    pub id: u64,
    pub commenter: Commenter,
    pub comment: String,
    pub created_time: DateTime<Utc>,
    pub last_edited_time: Option<DateTime<Utc>>,
}

/// A span of page text with the comments posted on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Anchor {
    pub offset: Offset,
    pub comments: Vec<StoredComment>,
}

/// All anchors of one page, kept sorted by start and pairwise disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Page {
    pub anchors: Vec<Anchor>,
}

/// Where a new comment's offset fits among a page's anchors.
pub(crate) enum Slot {
    /// An anchor with exactly this offset exists at the index.
    Existing(usize),
    /// No such anchor; a new one belongs at the index.
    Vacant(usize),
    /// The offset overlaps this existing anchor.
    Conflict(Offset),
}

impl Page {
    pub fn offsets(&self) -> Vec<Offset> {
        self.anchors.iter().map(|anchor| anchor.offset).collect()
    }

    pub fn slot_for(&self, offset: Offset) -> Slot {
        let index = self.anchors.partition_point(|anchor| anchor.offset.start < offset.start);

        if let Some(anchor) = self.anchors.get(index)
            && anchor.offset == offset
        {
            return Slot::Existing(index);
        }

        let neighbours = index.checked_sub(1).into_iter().chain([index]);
        for neighbour in neighbours {
            if let Some(anchor) = self.anchors.get(neighbour)
                && anchor.offset.overlaps(offset)
            {
                return Slot::Conflict(anchor.offset);
            }
        }

        Slot::Vacant(index)
    }

    /// Move or drop anchors according to `replacements`, which must be the
    /// remapper's output for [`Page::offsets`]. Returns the number of comments
    /// removed with dropped anchors.
    pub fn apply(&mut self, replacements: &[Replacement]) -> usize {
        debug_assert_eq!(self.anchors.len(), replacements.len());

        let mut removed_comments = 0;
        let anchors = std::mem::take(&mut self.anchors);
        self.anchors = anchors
            .into_iter()
            .zip(replacements)
            .filter_map(|(mut anchor, replacement)| match replacement.to {
                Some(to) => {
                    if to != anchor.offset {
                        log::debug!("moving anchor {:?} to {:?}", anchor.offset, to);
                    }
                    anchor.offset = to;
                    Some(anchor)
                }
                None => {
                    log::debug!(
                        "dropping anchor {:?} with {} comment(s)",
                        anchor.offset,
                        anchor.comments.len()
                    );
                    removed_comments += anchor.comments.len();
                    None
                }
            })
            .collect();
        removed_comments
    }
}
