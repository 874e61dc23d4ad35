// Sat Aug 22 2026 - Alex

pub mod node;
pub mod walker;

pub use node::{ExpandedObject, FieldView, RawSlot, SpecialEdge, TypeLevel};
pub use walker::GraphWalker;
