//! Domain model for members, problems and their notes.
//!
//! # Responsibility
//! - Define the records exchanged between service and repository layers.
//! - Keep entity identifiers strongly typed so they cannot be mixed up.
//!
//! # Invariants
//! - A `Note` always carries exactly one author and one problem reference.
//! - A note id exists only after persistence (`NewNote` has none).
//! - Audit timestamps are owned by the storage boundary.

pub mod audit;
pub mod ids;
pub mod member;
pub mod note;
pub mod problem;
