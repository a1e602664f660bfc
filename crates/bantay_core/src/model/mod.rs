//! Domain models for the two surveillance datasets.
//!
//! # Responsibility
//! - Define the canonical record shapes operators enter and upload.
//! - Define the boundary dataset the choropleth rollup joins against.
//!
//! # Invariants
//! - Every persisted record is identified by a store-assigned `RecordId`.
//! - Categorical fields are closed enums; free-text fields stay verbatim.

pub mod boundary;
pub mod case_report;
pub mod test_score;
