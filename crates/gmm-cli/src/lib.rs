//! `gmm`: writes Gradle Module Metadata (`module.json`) for Maven projects.

pub mod config;
pub mod generate;

pub use config::{GenerateArgs, MarkArgs, ProjectArgs};
pub use generate::{check, generate, mark};
