//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate registries, path allocation and entry synthesis into
//!   use-case level APIs callable from any front end.
//! - Keep presentation layers free of storage details.

pub mod bootstrap_service;
pub mod capture_service;
pub mod status_service;
pub mod validation;
