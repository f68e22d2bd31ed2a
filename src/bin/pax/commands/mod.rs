//! Command implementations

pub mod completions;
pub mod path;
pub mod plan;
pub mod root;
