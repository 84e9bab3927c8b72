use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opcode tag as emitted by sequence-matcher style diff libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Equal,
    Insert,
    Delete,
    Replace,
}

/// Raw `(tag, i1, i2, j1, j2)` opcode, exactly as it appears on the wire.
///
/// `i1..i2` is a range of the old text, `j1..j2` the range of the new text it
/// became. Nothing is checked at this level; see [`EditOp::try_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opcode {
    pub tag: Tag,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditOpError {
    #[error("equal opcode ({i1}..{i2}) carries no edit")]
    Equal { i1: usize, i2: usize },

    #[error("malformed {tag:?} opcode: i1={i1} i2={i2} j1={j1} j2={j2}")]
    Malformed {
        tag: Tag,
        i1: usize,
        i2: usize,
        j1: usize,
        j2: usize,
    },
}

/// One edit of the old document.
///
/// Constructed only through [`EditOp::try_from`], so every value satisfies the
/// shape rules of its tag: inserts have an empty old range and a non-empty new
/// range, deletes the reverse, replaces have both non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Opcode", into = "Opcode")]
pub enum EditOp {
    Insert { at: usize, j1: usize, j2: usize },
    Delete { i1: usize, i2: usize, at: usize },
    Replace { i1: usize, i2: usize, j1: usize, j2: usize },
}

impl EditOp {
    pub fn insert(at: usize, j1: usize, j2: usize) -> Result<Self, EditOpError> {
        Self::try_from(Opcode { tag: Tag::Insert, i1: at, i2: at, j1, j2 })
    }

    pub fn delete(i1: usize, i2: usize, at: usize) -> Result<Self, EditOpError> {
        Self::try_from(Opcode { tag: Tag::Delete, i1, i2, j1: at, j2: at })
    }

    pub fn replace(i1: usize, i2: usize, j1: usize, j2: usize) -> Result<Self, EditOpError> {
        Self::try_from(Opcode { tag: Tag::Replace, i1, i2, j1, j2 })
    }

    /// The `[i1, i2)` range of the old text this op touches. Empty for inserts.
    pub fn old_range(&self) -> (usize, usize) {
        let Opcode { i1, i2, .. } = Opcode::from(*self);
        (i1, i2)
    }

    /// Net change in document length caused by this op.
    pub fn length_delta(&self) -> isize {
        let Opcode { i1, i2, j1, j2, .. } = Opcode::from(*self);
        (j2 - j1) as isize - (i2 - i1) as isize
    }
}

impl TryFrom<Opcode> for EditOp {
    type Error = EditOpError;

    fn try_from(op: Opcode) -> Result<Self, Self::Error> {
        let Opcode { tag, i1, i2, j1, j2 } = op;
        let malformed = || EditOpError::Malformed { tag, i1, i2, j1, j2 };

        match tag {
            Tag::Equal => Err(EditOpError::Equal { i1, i2 }),
            Tag::Insert if i1 == i2 && j2 > j1 => Ok(EditOp::Insert { at: i1, j1, j2 }),
            Tag::Delete if i2 > i1 && j1 == j2 => Ok(EditOp::Delete { i1, i2, at: j1 }),
            Tag::Replace if i2 > i1 && j2 > j1 => Ok(EditOp::Replace { i1, i2, j1, j2 }),
            Tag::Insert | Tag::Delete | Tag::Replace => Err(malformed()),
        }
    }
}

impl From<EditOp> for Opcode {
    fn from(op: EditOp) -> Self {
        match op {
            EditOp::Insert { at, j1, j2 } => Opcode { tag: Tag::Insert, i1: at, i2: at, j1, j2 },
            EditOp::Delete { i1, i2, at } => Opcode { tag: Tag::Delete, i1, i2, j1: at, j2: at },
            EditOp::Replace { i1, i2, j1, j2 } => Opcode { tag: Tag::Replace, i1, i2, j1, j2 },
        }
    }
}

/// Convert a full opcode listing into edits.
///
/// Diff libraries usually interleave `equal` opcodes with the edits; those
/// are skipped here once their two ranges are confirmed to have the same
/// length. Everything else must be a well-formed edit.
pub fn edits_from_opcodes(
    opcodes: impl IntoIterator<Item = Opcode>,
) -> Result<Vec<EditOp>, EditOpError> {
    let mut edits = Vec::new();
    for op in opcodes {
        if op.tag == Tag::Equal {
            if op.i2 < op.i1 || op.j2 < op.j1 || op.i2 - op.i1 != op.j2 - op.j1 {
                return Err(EditOpError::Malformed {
                    tag: op.tag,
                    i1: op.i1,
                    i2: op.i2,
                    j1: op.j1,
                    j2: op.j2,
                });
            }
            continue;
        }
        edits.push(EditOp::try_from(op)?);
    }
    Ok(edits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Tag::Insert, 5, 6, 5, 10)]
    #[case(Tag::Insert, 5, 5, 5, 5)]
    #[case(Tag::Delete, 5, 5, 5, 5)]
    #[case(Tag::Delete, 5, 10, 5, 7)]
    #[case(Tag::Replace, 5, 10, 5, 5)]
    #[case(Tag::Replace, 5, 5, 5, 8)]
    #[case(Tag::Delete, 10, 5, 5, 5)]
    fn test_malformed_opcodes_are_rejected(
        #[case] tag: Tag,
        #[case] i1: usize,
        #[case] i2: usize,
        #[case] j1: usize,
        #[case] j2: usize,
    ) {
        let result = EditOp::try_from(Opcode { tag, i1, i2, j1, j2 });
        assert!(matches!(result, Err(EditOpError::Malformed { .. })));
    }

    #[test]
    fn test_parse_wire_format() {
        let json = r#"[
            {"tag": "delete", "i1": 20, "i2": 298, "j1": 20, "j2": 20},
            {"tag": "replace", "i1": 420, "i2": 423, "j1": 142, "j2": 145},
            {"tag": "insert", "i1": 538, "i2": 538, "j1": 260, "j2": 265}
        ]"#;

        let ops: Vec<EditOp> = serde_json::from_str(json).unwrap();

        assert_eq!(
            ops,
            vec![
                EditOp::Delete { i1: 20, i2: 298, at: 20 },
                EditOp::Replace { i1: 420, i2: 423, j1: 142, j2: 145 },
                EditOp::Insert { at: 538, j1: 260, j2: 265 },
            ]
        );
    }

    #[test]
    fn test_wire_format_rejects_malformed_insert() {
        let json = r#"{"tag": "insert", "i1": 3, "i2": 4, "j1": 3, "j2": 3}"#;
        assert!(serde_json::from_str::<EditOp>(json).is_err());
    }

    #[test]
    fn test_serializes_back_to_opcode_shape() {
        let op = EditOp::delete(15, 20, 15).unwrap();
        let json = serde_json::to_string(&op).unwrap();
        assert_eq!(json, r#"{"tag":"delete","i1":15,"i2":20,"j1":15,"j2":15}"#);
    }

    #[test]
    fn test_equal_opcodes_are_skipped() {
        let opcodes = vec![
            Opcode { tag: Tag::Equal, i1: 0, i2: 5, j1: 0, j2: 5 },
            Opcode { tag: Tag::Insert, i1: 5, i2: 5, j1: 5, j2: 9 },
            Opcode { tag: Tag::Equal, i1: 5, i2: 12, j1: 9, j2: 16 },
        ];

        let edits = edits_from_opcodes(opcodes).unwrap();

        assert_eq!(edits, vec![EditOp::Insert { at: 5, j1: 5, j2: 9 }]);
    }

    #[test]
    fn test_equal_opcode_with_mismatched_lengths_is_rejected() {
        let opcodes = vec![Opcode { tag: Tag::Equal, i1: 0, i2: 5, j1: 0, j2: 6 }];
        assert!(edits_from_opcodes(opcodes).is_err());
    }

    #[test]
    fn test_length_delta() {
        assert_eq!(EditOp::insert(3, 3, 8).unwrap().length_delta(), 5);
        assert_eq!(EditOp::delete(3, 8, 3).unwrap().length_delta(), -5);
        assert_eq!(EditOp::replace(3, 8, 3, 5).unwrap().length_delta(), -3);
        assert_eq!(EditOp::replace(752, 755, 471, 473).unwrap().old_range(), (752, 755));
    }
}
