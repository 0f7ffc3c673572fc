//! Equivalence comparison of normalized XML trees.

pub mod engine;
pub mod path;
pub mod result;

pub use engine::{compare, compare_documents, compare_nodes, EquivalenceError, Side};
pub use path::{MismatchPath, PathSegment};
pub use result::{Mismatch, MismatchKind};
