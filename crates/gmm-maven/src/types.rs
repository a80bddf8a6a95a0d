//! Domain types for the pom.xml subset read by this crate.

use crate::error::{MavenError, Result};
use std::collections::HashMap;

/// Packaging used when a POM declares none.
pub const DEFAULT_PACKAGING: &str = "jar";
/// Dependency type used when a dependency declares none.
pub const DEFAULT_TYPE: &str = "jar";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MavenProject {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: String,
    pub parent: Option<ParentRef>,
    pub properties: HashMap<String, String>,
    pub dependencies: Vec<MavenDependency>,
    pub dependency_management: Vec<MavenDependency>,
    pub plugin_config: PluginConfig,
    /// Whether the pom.xml text carries the metadata marker comment.
    pub has_marker: bool,
}

impl MavenProject {
    pub fn group_id(&self) -> Result<&str> {
        self.group_id
            .as_deref()
            .ok_or(MavenError::MissingCoordinate { field: "groupId" })
    }

    pub fn artifact_id(&self) -> Result<&str> {
        self.artifact_id
            .as_deref()
            .ok_or(MavenError::MissingCoordinate {
                field: "artifactId",
            })
    }

    pub fn version(&self) -> Result<&str> {
        self.version
            .as_deref()
            .ok_or(MavenError::MissingCoordinate { field: "version" })
    }

    /// `pom` projects are platforms/BOMs and get no module metadata.
    pub fn is_pom_packaging(&self) -> bool {
        self.packaging == "pom"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParentRef {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    /// `None` when absent (defaults to `../pom.xml`), `Some("")` when empty (no local lookup).
    pub relative_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    /// `None` when the POM declares no scope.
    pub scope: Option<MavenScope>,
    pub dep_type: String,
    pub classifier: Option<String>,
    pub optional: bool,
    pub exclusions: Vec<Exclusion>,
}

impl MavenDependency {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
            scope: None,
            dep_type: DEFAULT_TYPE.to_string(),
            classifier: None,
            optional: false,
            exclusions: Vec::new(),
        }
    }

    /// Canonical identifier: "{groupId}:{artifactId}"
    pub fn name(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Scope with Maven's default applied.
    pub fn effective_scope(&self) -> MavenScope {
        self.scope.clone().unwrap_or_default()
    }

    /// Identity used to merge inherited and managed dependencies.
    pub(crate) fn management_key(&self) -> (String, String, String, Option<String>) {
        (
            self.group_id.clone(),
            self.artifact_id.clone(),
            self.dep_type.clone(),
            self.classifier.clone(),
        )
    }

    /// Whether this dependency needs an artifact selector (non-jar type or a classifier).
    pub fn selects_artifact(&self) -> bool {
        self.classifier.as_deref().is_some_and(|c| !c.is_empty()) || self.dep_type != DEFAULT_TYPE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub group_id: String,
    pub artifact_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MavenScope {
    #[default]
    Compile,
    Test,
    Runtime,
    Provided,
    System,
    Import,
    /// A scope Maven does not define; neither Java variant includes it.
    Other(String),
}

impl MavenScope {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Compile => "compile",
            Self::Test => "test",
            Self::Runtime => "runtime",
            Self::Provided => "provided",
            Self::System => "system",
            Self::Import => "import",
            Self::Other(scope) => scope,
        }
    }
}

impl std::str::FromStr for MavenScope {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "test" => Self::Test,
            "runtime" => Self::Runtime,
            "provided" => Self::Provided,
            "system" => Self::System,
            "import" => Self::Import,
            "compile" => Self::Compile,
            _ => Self::Other(s.to_string()),
        })
    }
}

/// Options of the `gradle-module-metadata-maven-plugin` plugin block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PluginConfig {
    pub platform_dependencies: Vec<MavenDependency>,
    pub capabilities: Vec<CapabilityConfig>,
    pub removed_dependencies: Vec<MavenDependency>,
}

impl PluginConfig {
    pub fn is_empty(&self) -> bool {
        self.platform_dependencies.is_empty()
            && self.capabilities.is_empty()
            && self.removed_dependencies.is_empty()
    }

    /// Whether `dep` is listed in `removedDependencies` (matched on group and artifact).
    pub fn is_removed(&self, dep: &MavenDependency) -> bool {
        self.removed_dependencies
            .iter()
            .any(|r| r.group_id == dep.group_id && r.artifact_id == dep.artifact_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityConfig {
    pub group_id: String,
    pub artifact_id: String,
    /// Defaults to the project version when absent.
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_variants() {
        assert!(matches!(
            "test".parse::<MavenScope>().unwrap(),
            MavenScope::Test
        ));
        assert!(matches!(
            "RUNTIME".parse::<MavenScope>().unwrap(),
            MavenScope::Runtime
        ));
        assert!(matches!(
            "provided".parse::<MavenScope>().unwrap(),
            MavenScope::Provided
        ));
        assert!(matches!(
            "system".parse::<MavenScope>().unwrap(),
            MavenScope::System
        ));
        assert!(matches!(
            "import".parse::<MavenScope>().unwrap(),
            MavenScope::Import
        ));
        assert_eq!(
            "compile".parse::<MavenScope>().unwrap(),
            MavenScope::Compile
        );
        assert_eq!(
            "runtme".parse::<MavenScope>().unwrap(),
            MavenScope::Other("runtme".into())
        );
        assert_eq!(MavenScope::Other("runtme".into()).as_str(), "runtme");
        assert_eq!(MavenScope::Provided.as_str(), "provided");
    }

    #[test]
    fn test_effective_scope_defaults_to_compile() {
        let dep = MavenDependency::new("a", "b");
        assert_eq!(dep.effective_scope(), MavenScope::Compile);
        assert_eq!(dep.name(), "a:b");
    }

    #[test]
    fn test_selects_artifact() {
        let mut dep = MavenDependency::new("a", "b");
        assert!(!dep.selects_artifact());
        dep.classifier = Some(String::new());
        assert!(!dep.selects_artifact());
        dep.classifier = Some("tests".into());
        assert!(dep.selects_artifact());

        let mut dep = MavenDependency::new("a", "b");
        dep.dep_type = "zip".into();
        assert!(dep.selects_artifact());
    }

    #[test]
    fn test_missing_coordinates() {
        let project = MavenProject::default();
        assert!(matches!(
            project.group_id(),
            Err(MavenError::MissingCoordinate { field: "groupId" })
        ));
        assert!(project.artifact_id().is_err());
        assert!(project.version().is_err());
    }

    #[test]
    fn test_is_removed() {
        let config = PluginConfig {
            removed_dependencies: vec![MavenDependency::new("org.shaded", "lib")],
            ..PluginConfig::default()
        };
        let mut dep = MavenDependency::new("org.shaded", "lib");
        dep.version = Some("1.0".into());
        assert!(config.is_removed(&dep));
        assert!(!config.is_removed(&MavenDependency::new("org.shaded", "other")));
    }
}
