//! Well-known Gradle attribute names and values.

use std::collections::BTreeMap;

/// Ordered attribute map; keys are unique and emitted in lexicographic order.
pub type Attributes = BTreeMap<String, String>;

pub const STATUS: &str = "org.gradle.status";
pub const USAGE: &str = "org.gradle.usage";
pub const CATEGORY: &str = "org.gradle.category";
pub const BUNDLING: &str = "org.gradle.dependency.bundling";
pub const LIBRARY_ELEMENTS: &str = "org.gradle.libraryelements";

pub const STATUS_RELEASE: &str = "release";
pub const STATUS_INTEGRATION: &str = "integration";

pub const USAGE_JAVA_API: &str = "java-api";
pub const USAGE_JAVA_RUNTIME: &str = "java-runtime";

pub const CATEGORY_LIBRARY: &str = "library";
pub const CATEGORY_PLATFORM: &str = "platform";

pub const BUNDLING_EXTERNAL: &str = "external";
pub const LIBRARY_ELEMENTS_JAR: &str = "jar";
