use thiserror::Error;

use crate::models::{Offset, Opcode};

/// Longest comment accepted, in UTF-16 code units (what browsers count).
pub const MAX_COMMENT_LENGTH: usize = 65535;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid path: {0:?}")]
    InvalidPath(String),
    #[error("Invalid offset: {}..{}", .0.start, .0.end)]
    InvalidOffset(Offset),
    #[error("Invalid comment: length {0} is outside 1..=65535")]
    InvalidComment(usize),
    #[error("Diff is empty")]
    EmptyDiff,
    #[error("Commit hash is empty")]
    EmptyCommitHash,
}

/// Page paths are site-absolute, e.g. `/graph/dfs/`.
pub fn validate_path(path: &str) -> Result<(), ValidationError> {
    if !path.starts_with('/') {
        return Err(ValidationError::InvalidPath(path.to_string()));
    }
    Ok(())
}

pub fn validate_offset(offset: Offset) -> Result<(), ValidationError> {
    if offset.start >= offset.end {
        return Err(ValidationError::InvalidOffset(offset));
    }
    Ok(())
}

pub fn validate_comment(comment: &str) -> Result<(), ValidationError> {
    let length = comment.encode_utf16().count();
    if !(1..=MAX_COMMENT_LENGTH).contains(&length) {
        return Err(ValidationError::InvalidComment(length));
    }
    Ok(())
}

pub fn validate_diff(diff: &[Opcode]) -> Result<(), ValidationError> {
    if diff.is_empty() {
        return Err(ValidationError::EmptyDiff);
    }
    Ok(())
}

pub fn validate_commit_hash(hash: &str) -> Result<(), ValidationError> {
    if hash.is_empty() {
        return Err(ValidationError::EmptyCommitHash);
    }
    Ok(())
}
