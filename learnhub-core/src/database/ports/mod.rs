//! Repository ports consumed by the domain services.
//!
//! Reads that target one row fail with [`crate::StoreError::NoRows`] when
//! nothing matches. Writes replace whole columns of an existing row.

pub mod courses;
pub mod users;
