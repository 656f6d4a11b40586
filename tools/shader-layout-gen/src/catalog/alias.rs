//! Alias resolution
//!
//! Two declared attributes at the same byte offset are two views over one
//! piece of storage. The later one records the index of the earliest
//! attribute at that offset; both stay in the shader's input list.

use crate::model::InputAttribute;

/// Index of the earliest attribute in `existing` placed at `offset`
pub fn resolve(existing: &[InputAttribute], offset: u32) -> Option<usize> {
    existing.iter().position(|attr| attr.offset == offset)
}
