use serde::{Deserialize, Serialize};

/// A half-open character range `[start, end)` in a page's text.
///
/// Comments are attached to offsets. A valid offset is never empty; the
/// remapper reports an anchor that would become empty as dropped instead of
/// producing an empty `Offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Offset {
    /// Inclusive start position.
    pub start: usize,
    /// Exclusive end position.
    pub end: usize,
}

impl Offset {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// True if the two ranges share at least one position.
    /// Adjacent offsets (`a.end == b.start`) do not overlap.
    #[must_use]
    pub fn overlaps(self, other: Offset) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Where an anchor ended up after a page edit.
///
/// `to` is `None` when the anchored text no longer exists; the anchor and
/// every comment on it should be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub from: Offset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Offset>,
}

impl Replacement {
    pub fn moved(from: Offset, to: Offset) -> Self {
        Self { from, to: Some(to) }
    }

    pub fn dropped(from: Offset) -> Self {
        Self { from, to: None }
    }

    pub fn is_dropped(&self) -> bool {
        self.to.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_and_empty() {
        assert_eq!(Offset::new(3, 10).len(), 7);
        assert!(Offset::new(5, 5).is_empty());
        assert!(Offset::new(6, 5).is_empty());
    }

    #[test]
    fn test_adjacent_offsets_do_not_overlap() {
        let left = Offset::new(0, 10);
        let right = Offset::new(10, 20);

        assert!(!left.overlaps(right));
        assert!(!right.overlaps(left));
        assert!(left.overlaps(Offset::new(9, 12)));
        assert!(Offset::new(2, 4).overlaps(left));
    }

    #[test]
    fn test_dropped_replacement_omits_target_in_json() {
        let json = serde_json::to_string(&Replacement::dropped(Offset::new(1, 2))).unwrap();
        assert_eq!(json, r#"{"from":{"start":1,"end":2}}"#);

        let parsed: Replacement = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_dropped());
    }
}
