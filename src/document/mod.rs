//! Document snapshot: layout tree input and the content blocks derived from it

mod block;
mod extract;
mod tree;

pub use block::{BlockId, BlockIdAllocator, BlockType, ContentBlock};
pub use extract::extract_blocks;
pub use tree::{Descendants, LayoutNode, RoleSelectors};
