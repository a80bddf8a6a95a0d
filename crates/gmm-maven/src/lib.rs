//! Maven support for Gradle Module Metadata.
//!
//! Reads a `pom.xml` (with local parents), then maps the effective project
//! onto the `apiElements` and `runtimeElements` variants of a Java library.

pub mod effective;
pub mod error;
pub mod interpolate;
pub mod java_library;
pub mod marker;
pub mod parser;
pub mod types;

pub use effective::load_effective_project;
pub use error::{MavenError, Result};
pub use java_library::{GenerateOptions, build_module, is_snapshot, module_for_pom};
pub use marker::{MARKER, ensure_marker, insert_marker};
pub use parser::parse_pom_xml;
pub use types::{
    CapabilityConfig, Exclusion, MavenDependency, MavenProject, MavenScope, ParentRef,
    PluginConfig,
};
