//! Domain model for the product-code table.
//!
//! # Responsibility
//! - Define the record types core persistence maps rows into.
//!
//! # Invariants
//! - Every record is identified by its `code`.
//! - Records are never deleted by core; there is no tombstone state.

pub mod product_code;
