//! Registry lists: codec, template sources and the store.
//!
//! # Responsibility
//! - Own the textual list format (`codec`).
//! - Provide seed content for registries created on first append (`template`).
//! - Serialize read-modify-write appends per artifact (`store`).
//!
//! # Invariants
//! - Registries only ever grow by append; items are never edited or removed here.

pub mod codec;
pub mod store;
pub mod template;
