//! Domain model for registries and ledger entries.
//!
//! # Responsibility
//! - Name the controlled vocabulary axes.
//! - Define raw (draft) and validated (fields) entry shapes.
//!
//! # Invariants
//! - Every vocabulary category maps to exactly one registry artifact.
//! - `EntryFields` only exists after validation succeeded.

pub mod entry;
pub mod vocabulary;
