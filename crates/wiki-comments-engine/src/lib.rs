pub mod io;
pub mod models;
pub mod remap;
pub mod store;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use models::*;
pub use remap::{RemapError, check_preconditions, remap_offsets};
pub use store::{CommentStore, StoreError};
pub use validation::ValidationError;
