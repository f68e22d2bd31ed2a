//! Core data structures

pub mod build_root;
pub mod manifest;
pub mod registry;
pub mod relative;

pub use build_root::{BuildRoot, BuildRootError};
pub use manifest::{Manifest, ManifestError};
pub use registry::{Capability, Registry, RegistryError, Resolver};
pub use relative::RelativeOutputPath;
