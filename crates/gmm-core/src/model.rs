//! In-memory representation of a Gradle module.
//!
//! Field order in these structs is the key order of the emitted JSON, so
//! reordering fields changes the output bytes.

use crate::attributes::{self, Attributes};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Version of the metadata format written by this crate.
pub const FORMAT_VERSION: &str = "1.1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub format_version: String,
    pub component: Component,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub created_by: BTreeMap<String, Creator>,
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub group: String,
    pub module: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
}

/// Tool that produced the metadata, keyed by tool name in [`Module::created_by`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependency_constraints: Vec<DependencyConstraint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<File>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<Capability>,
}

impl Variant {
    /// Value of the `org.gradle.usage` attribute, if any.
    pub fn usage(&self) -> Option<&str> {
        self.attributes.get(attributes::USAGE).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub group: String,
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionConstraint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<Exclude>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "is_false")]
    pub endorse_strict_versions: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_party_compatibility: Option<ThirdPartyCompatibility>,
}

impl Dependency {
    /// Dependency on `group:module` with an optional required version.
    pub fn new(
        group: impl Into<String>,
        module: impl Into<String>,
        version: Option<String>,
    ) -> Self {
        Self {
            group: group.into(),
            module: module.into(),
            version: version.map(VersionConstraint::requires),
            excludes: Vec::new(),
            attributes: Attributes::new(),
            endorse_strict_versions: false,
            third_party_compatibility: None,
        }
    }

    /// "{group}:{module}"
    pub fn coordinate(&self) -> String {
        format!("{}:{}", self.group, self.module)
    }

    /// Marks this dependency as a platform dependency whose strict versions are endorsed.
    #[must_use]
    pub fn into_platform(mut self) -> Self {
        self.attributes.insert(
            attributes::CATEGORY.to_string(),
            attributes::CATEGORY_PLATFORM.to_string(),
        );
        self.endorse_strict_versions = true;
        self
    }

    #[must_use]
    pub fn with_excludes(mut self, excludes: Vec<Exclude>) -> Self {
        self.excludes = excludes;
        self
    }

    #[must_use]
    pub fn with_artifact_selector(mut self, selector: ArtifactSelector) -> Self {
        self.third_party_compatibility = Some(ThirdPartyCompatibility {
            artifact_selector: selector,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyConstraint {
    pub group: String,
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionConstraint>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strictly: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefers: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejects: Vec<String>,
}

impl VersionConstraint {
    pub fn requires(version: impl Into<String>) -> Self {
        Self {
            requires: Some(version.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.requires.is_none()
            && self.strictly.is_none()
            && self.prefers.is_none()
            && self.rejects.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclude {
    pub group: String,
    pub module: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirdPartyCompatibility {
    pub artifact_selector: ArtifactSelector,
}

/// Selects a non-default artifact (other type or a classifier) of a dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactSelector {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

/// A published file of a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    pub url: String,
    pub size: u64,
    pub sha512: String,
    pub sha256: String,
    pub sha1: String,
    pub md5: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl Module {
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Checks the structural invariants of the module.
    ///
    /// Variants must exist, have unique non-empty names and a usage
    /// attribute; dependencies must be unique per variant.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        require_non_empty("component.group", &self.component.group)?;
        require_non_empty("component.module", &self.component.module)?;
        require_non_empty("component.version", &self.component.version)?;

        if self.variants.is_empty() {
            return Err(ValidationError::NoVariants);
        }

        let mut names = HashSet::new();
        for variant in &self.variants {
            require_non_empty("variant.name", &variant.name)?;
            if !names.insert(variant.name.as_str()) {
                return Err(ValidationError::DuplicateVariant {
                    name: variant.name.clone(),
                });
            }
            if variant.usage().is_none() {
                return Err(ValidationError::MissingUsage {
                    variant: variant.name.clone(),
                });
            }

            // platform dependencies and other artifacts of a coordinate are distinct entries
            let mut seen = HashSet::new();
            for dep in &variant.dependencies {
                let key = (
                    dep.group.as_str(),
                    dep.module.as_str(),
                    &dep.attributes,
                    dep.third_party_compatibility.as_ref(),
                );
                if !seen.insert(key) {
                    return Err(ValidationError::DuplicateDependency {
                        variant: variant.name.clone(),
                        coordinate: dep.coordinate(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField {
            field: field.to_string(),
        });
    }
    Ok(())
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(name: &str, usage: Option<&str>) -> Variant {
        let mut attributes = Attributes::new();
        if let Some(usage) = usage {
            attributes.insert(attributes::USAGE.into(), usage.into());
        }
        Variant {
            name: name.into(),
            attributes,
            dependencies: vec![],
            dependency_constraints: vec![],
            files: vec![],
            capabilities: vec![],
        }
    }

    fn module(variants: Vec<Variant>) -> Module {
        Module {
            format_version: FORMAT_VERSION.into(),
            component: Component {
                group: "org.example".into(),
                module: "lib".into(),
                version: "1.0".into(),
                attributes: Attributes::new(),
            },
            created_by: BTreeMap::new(),
            variants,
        }
    }

    #[test]
    fn test_validate_ok() {
        let m = module(vec![variant("apiElements", Some("java-api"))]);
        assert!(m.validate().is_ok());
    }

    #[test]
    fn test_validate_no_variants() {
        assert_eq!(module(vec![]).validate(), Err(ValidationError::NoVariants));
    }

    #[test]
    fn test_validate_duplicate_variant() {
        let m = module(vec![
            variant("apiElements", Some("java-api")),
            variant("apiElements", Some("java-runtime")),
        ]);
        assert!(matches!(
            m.validate(),
            Err(ValidationError::DuplicateVariant { ref name }) if name == "apiElements"
        ));
    }

    #[test]
    fn test_validate_missing_usage() {
        let m = module(vec![variant("custom", None)]);
        assert!(matches!(
            m.validate(),
            Err(ValidationError::MissingUsage { .. })
        ));
    }

    #[test]
    fn test_validate_duplicate_dependency() {
        let mut v = variant("apiElements", Some("java-api"));
        v.dependencies.push(Dependency::new("a", "b", Some("1".into())));
        v.dependencies.push(Dependency::new("a", "b", Some("2".into())));
        let err = module(vec![v]).validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateDependency {
                variant: "apiElements".into(),
                coordinate: "a:b".into(),
            }
        );
    }

    #[test]
    fn test_platform_and_library_dependency_coexist() {
        let mut v = variant("apiElements", Some("java-api"));
        v.dependencies.push(Dependency::new("a", "b", Some("1".into())));
        v.dependencies
            .push(Dependency::new("a", "b", Some("1".into())).into_platform());
        assert!(module(vec![v]).validate().is_ok());
    }

    #[test]
    fn test_classifiers_of_one_artifact_coexist() {
        let native = |classifier: &str| {
            Dependency::new("io.netty", "netty-transport-native-epoll", Some("4.1.100".into()))
                .with_artifact_selector(ArtifactSelector {
                    name: "netty-transport-native-epoll".into(),
                    kind: "jar".into(),
                    extension: None,
                    classifier: Some(classifier.into()),
                })
        };
        let mut v = variant("runtimeElements", Some("java-runtime"));
        v.dependencies.push(native("linux-x86_64"));
        v.dependencies.push(native("linux-aarch_64"));
        assert!(module(vec![v.clone()]).validate().is_ok());

        v.dependencies.push(native("linux-x86_64"));
        assert!(matches!(
            module(vec![v]).validate(),
            Err(ValidationError::DuplicateDependency { .. })
        ));
    }

    #[test]
    fn test_validate_empty_coordinate() {
        let mut m = module(vec![variant("apiElements", Some("java-api"))]);
        m.component.group = "  ".into();
        assert!(matches!(
            m.validate(),
            Err(ValidationError::EmptyField { ref field }) if field == "component.group"
        ));
    }

    #[test]
    fn test_into_platform() {
        let dep = Dependency::new("com.fasterxml.jackson", "jackson-bom", Some("2.10.2".into()))
            .into_platform();
        assert!(dep.endorse_strict_versions);
        assert_eq!(
            dep.attributes.get(attributes::CATEGORY).map(String::as_str),
            Some("platform")
        );
    }

    #[test]
    fn test_version_constraint_is_empty() {
        assert!(VersionConstraint::default().is_empty());
        assert!(!VersionConstraint::requires("1.0").is_empty());
    }
}
