//! Gradle Module Metadata model, builder and serializer.
//!
//! A [`Module`] is assembled with [`ModuleBuilder`], validated on `build()`,
//! and rendered to a deterministic JSON document with [`to_json`].
//! [`from_json`] reads a document back into the model.

pub mod attributes;
pub mod builder;
pub mod checksum;
pub mod error;
pub mod model;
pub mod serializer;

pub use builder::{ModuleBuilder, VariantBuilder};
pub use checksum::FileDigest;
pub use error::{GmmError, Result, ValidationError};
pub use model::{
    ArtifactSelector, Capability, Component, Creator, Dependency, DependencyConstraint,
    Exclude, FORMAT_VERSION, File, Module, ThirdPartyCompatibility, Variant, VersionConstraint,
};
pub use serializer::{from_json, to_json, write_to};
