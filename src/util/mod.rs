//! Shared utilities

pub mod config;
pub mod context;
pub mod diagnostic;
pub mod fs;

pub use config::{Config, Environment};
pub use context::GlobalContext;
pub use diagnostic::Diagnostic;
