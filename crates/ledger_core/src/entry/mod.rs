//! Entry artifact synthesis.
//!
//! # Responsibility
//! - Allocate collision-free, date-partitioned entry paths (`path`).
//! - Render entry header + body text (`builder`).
//! - Edit single header values of existing entries (`frontmatter`).

pub mod builder;
pub mod frontmatter;
pub mod path;
