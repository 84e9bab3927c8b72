pub mod comment;
pub mod edit_op;
pub mod offset;

pub use comment::{Comment, Commenter, PageChange};
pub use edit_op::{EditOp, EditOpError, Opcode, Tag, edits_from_opcodes};
pub use offset::{Offset, Replacement};
