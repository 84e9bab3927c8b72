/*!
 * # Anchor Remapping
 *
 * When a wiki page is rebuilt, the site build sends the diff between the old
 * and the new page text as a list of [`EditOp`]s. Every comment anchor on the
 * page has to follow its text through that diff:
 *
 * - text inserted before an anchor shifts it right
 * - text inserted or removed inside an anchor resizes it
 * - an edit that eats one edge of an anchor trims that edge
 * - an edit that swallows the whole anchor drops it, along with its comments
 *
 * Because the ops of a diff never overlap on the old text, each op's effect on
 * an anchor is independent of the others. The remapper therefore evaluates
 * every op against every anchor and sums the start/end shifts, then turns the
 * totals into one [`Replacement`] per anchor.
 *
 * [`remap_offsets`] is pure and never fails. Inputs from outside the process
 * should go through [`check_preconditions`] first; in debug builds the
 * remapper asserts the same conditions itself.
 */

use thiserror::Error;

use crate::models::{EditOp, Offset, Replacement};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemapError {
    #[error("anchor {index} is empty: {offset:?}")]
    EmptyAnchor { index: usize, offset: Offset },

    #[error("anchor {index} starts before the anchor preceding it")]
    UnsortedAnchors { index: usize },

    #[error("anchor {index} overlaps the anchor preceding it")]
    OverlappingAnchors { index: usize },

    #[error("edit {index} starts inside or before the edit preceding it")]
    UnorderedEdits { index: usize },
}

/// Running shift for one anchor, summed over all ops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Delta {
    start: isize,
    end: isize,
    invalid: bool,
}

/// Position of an edited old-text range relative to an anchor `[start, end)`.
///
/// The variants partition every possible relation; the order of the checks in
/// [`classify_range`] decides the boundary cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlap {
    /// Entirely before the anchor, possibly touching its start.
    Before,
    /// Entirely within the anchor, possibly touching either edge.
    Inside,
    /// Starts before the anchor and ends inside it.
    LeftEdge,
    /// Starts inside the anchor and ends at or past its end.
    RightEdge,
    /// Starts before the anchor and ends past it.
    Covers,
    /// Entirely after the anchor.
    After,
}

/// Classify a non-empty old-text range `[i1, i2)` against `anchor`.
fn classify_range(i1: usize, i2: usize, anchor: Offset) -> Overlap {
    let Offset { start, end } = anchor;

    if i2 <= start {
        Overlap::Before
    } else if i1 >= start && i2 <= end {
        Overlap::Inside
    } else if i1 < start && i2 <= end {
        Overlap::LeftEdge
    } else if i1 >= start && i1 < end {
        Overlap::RightEdge
    } else if i1 < start {
        Overlap::Covers
    } else {
        Overlap::After
    }
}

/// Position of an insertion point relative to an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Point {
    Before,
    Inside,
    After,
}

/// Classify an insertion point against `anchor`. Text inserted exactly at the
/// anchor's start joins the anchor; text inserted at its end does not.
fn classify_point(at: usize, anchor: Offset) -> Point {
    if at < anchor.start {
        Point::Before
    } else if at < anchor.end {
        Point::Inside
    } else {
        Point::After
    }
}

/// Add the effect of one op on one anchor to its running delta.
fn accumulate(delta: &mut Delta, anchor: Offset, op: &EditOp) {
    match *op {
        EditOp::Insert { at, j1, j2 } => {
            let inserted = (j2 - j1) as isize;
            match classify_point(at, anchor) {
                Point::Before => {
                    delta.start += inserted;
                    delta.end += inserted;
                }
                Point::Inside => delta.end += inserted,
                Point::After => {}
            }
        }
        EditOp::Delete { i1, i2, .. } | EditOp::Replace { i1, i2, .. } => {
            let start = anchor.start as isize;
            let end = anchor.end as isize;
            match classify_range(i1, i2, anchor) {
                Overlap::Before => {
                    let change = op.length_delta();
                    delta.start += change;
                    delta.end += change;
                }
                Overlap::Inside => delta.end += op.length_delta(),
                Overlap::LeftEdge => {
                    // Starts where the edit started; the eaten prefix is gone.
                    let shift = i1 as isize - start;
                    delta.start += shift;
                    delta.end += shift - (i2 as isize - start);
                }
                Overlap::RightEdge => delta.end += i1 as isize - end,
                Overlap::Covers => delta.invalid = true,
                Overlap::After => {}
            }
        }
    }
}

/// Turn an anchor and its accumulated delta into the final replacement.
fn resolve(from: Offset, delta: Delta) -> Replacement {
    if delta.invalid {
        return Replacement::dropped(from);
    }

    let start = from.start as isize + delta.start;
    let end = from.end as isize + delta.end;

    match (usize::try_from(start), usize::try_from(end)) {
        (Ok(start), Ok(end)) if start < end => Replacement::moved(from, Offset::new(start, end)),
        // Eroded to nothing by partial overlaps.
        _ => Replacement::dropped(from),
    }
}

/// Compute where each anchor lands after `ops` are applied to the page.
///
/// `anchors` must be sorted by start and pairwise disjoint, and `ops` must be
/// ordered along the old text without overlapping (the order diff libraries
/// emit them in). The result has one entry per anchor, in the same order.
pub fn remap_offsets(anchors: &[Offset], ops: &[EditOp]) -> Vec<Replacement> {
    debug_assert_eq!(check_preconditions(anchors, ops), Ok(()));

    let mut deltas = vec![Delta::default(); anchors.len()];

    for op in ops {
        for (anchor, delta) in anchors.iter().zip(deltas.iter_mut()) {
            accumulate(delta, *anchor, op);
        }
    }

    anchors
        .iter()
        .zip(deltas)
        .map(|(anchor, delta)| resolve(*anchor, delta))
        .collect()
}

/// Check the input conditions [`remap_offsets`] relies on.
pub fn check_preconditions(anchors: &[Offset], ops: &[EditOp]) -> Result<(), RemapError> {
    for (index, offset) in anchors.iter().enumerate() {
        if offset.is_empty() {
            return Err(RemapError::EmptyAnchor { index, offset: *offset });
        }
    }

    for (index, pair) in anchors.windows(2).enumerate() {
        let (previous, current) = (pair[0], pair[1]);
        if current.start < previous.start {
            return Err(RemapError::UnsortedAnchors { index: index + 1 });
        }
        if current.start < previous.end {
            return Err(RemapError::OverlappingAnchors { index: index + 1 });
        }
    }

    for (index, pair) in ops.windows(2).enumerate() {
        let (_, previous_end) = pair[0].old_range();
        let (current_start, _) = pair[1].old_range();
        if current_start < previous_end {
            return Err(RemapError::UnorderedEdits { index: index + 1 });
        }
    }

    Ok(())
}
