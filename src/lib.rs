//! Pax - build root detection and public path planning for the admin theme bundle
//!
//! This crate locates the project root of a theme bundle, expresses the
//! bundle's output directory relative to it, and derives the build plan
//! (entries, output and public paths, dev server proxy) a bundler consumes.

pub mod core;
pub mod ops;
pub mod util;

/// Test utilities for pax unit tests.
///
/// Only compiled for tests. Provides an on-disk project fixture.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    build_root::{find_build_root, BuildRoot},
    manifest::Manifest,
    registry::{Registry, Resolver},
    relative::{compute_relative_output_path, RelativeOutputPath},
};

pub use crate::ops::plan::{plan, BuildPlan, Mode, PlanOptions};
pub use crate::util::context::GlobalContext;
