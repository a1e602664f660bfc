//! Chart aggregation over in-memory record snapshots.
//!
//! # Responsibility
//! - Turn record snapshots into render-ready chart payloads.
//! - Stay pure: no store access, no clock, no I/O.
//!
//! # Invariants
//! - Aggregation never fails; degenerate inputs produce empty or zeroed
//!   output instead of errors.

pub mod breakdown;
pub mod color;
pub mod geo;
pub mod histogram;
pub mod series;
