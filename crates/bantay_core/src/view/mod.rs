//! Presentation-side helpers over record snapshots.

pub mod sort;
