pub mod exclusion;
pub mod tree_walker;

pub use exclusion::ExclusionSet;
pub use tree_walker::{FileEntry, SourceFile, TreeWalker, WalkEntry, WalkResult};
