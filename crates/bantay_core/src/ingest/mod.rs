//! Upload pipeline: delimited text to persisted records.
//!
//! # Responsibility
//! - Parse raw delimited uploads into header-keyed rows.
//! - Validate rows against the two record schemas.
//! - Drive per-row persistence with failure isolation, progress and
//!   cooperative cancellation.
//!
//! # Invariants
//! - A structural parse failure aborts the whole upload before any write.
//! - One row's validation or store failure never stops later rows.
//! - Rows are written in strict input order, one at a time.

pub mod batch;
pub mod tabular;
pub mod validate;
