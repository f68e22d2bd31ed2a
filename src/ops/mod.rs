//! High-level operations

pub mod plan;
