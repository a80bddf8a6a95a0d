//! Maps a Maven jar project onto the variants Gradle's `java-library`
//! plugin publishes: `apiElements` and `runtimeElements`.

use crate::effective::load_effective_project;
use crate::error::{MavenError, Result};
use crate::marker;
use crate::types::{MavenDependency, MavenProject, MavenScope};
use gmm_core::{
    ArtifactSelector, Capability, Dependency, Exclude, File, Module, ModuleBuilder,
    VariantBuilder, attributes,
};
use std::path::{Path, PathBuf};

/// Tool name recorded under `createdBy`.
pub const CREATOR: &str = "maven";

/// Inputs that come from the build rather than from the POM.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Version of the build tool recorded under `createdBy`.
    pub maven_version: String,
    /// The built main artifact (usually the jar).
    pub artifact: PathBuf,
    /// Classifier of the main artifact, if any.
    pub classifier: Option<String>,
    /// Refuse to generate metadata for POMs without the marker comment.
    pub require_marker: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JavaVariant {
    Api,
    Runtime,
}

impl JavaVariant {
    const ALL: [Self; 2] = [Self::Api, Self::Runtime];

    fn name(self) -> &'static str {
        match self {
            Self::Api => "apiElements",
            Self::Runtime => "runtimeElements",
        }
    }

    fn usage(self) -> &'static str {
        match self {
            Self::Api => attributes::USAGE_JAVA_API,
            Self::Runtime => attributes::USAGE_JAVA_RUNTIME,
        }
    }

    fn includes(self, scope: &MavenScope) -> bool {
        match self {
            Self::Api => matches!(scope, MavenScope::Compile),
            Self::Runtime => matches!(scope, MavenScope::Compile | MavenScope::Runtime),
        }
    }
}

/// Whether `version` marks an integration build.
pub fn is_snapshot(version: &str) -> bool {
    version.ends_with("SNAPSHOT")
}

/// Loads the POM at `pom_path` and maps it to a module.
///
/// Returns `Ok(None)` for `pom` packaging, which gets no module metadata.
pub fn module_for_pom(pom_path: &Path, options: &GenerateOptions) -> Result<Option<Module>> {
    let project = load_effective_project(pom_path)?;
    if project.is_pom_packaging() {
        tracing::info!(
            "Skipping {:?}: 'pom' packaging is published without module metadata",
            pom_path
        );
        return Ok(None);
    }
    if options.require_marker && !project.has_marker {
        return Err(MavenError::MissingMarker {
            marker: marker::MARKER,
            path: std::path::absolute(pom_path).unwrap_or_else(|_| pom_path.to_path_buf()),
        });
    }
    build_module(&project, options)
}

/// Maps an effective project to a module with `apiElements` and `runtimeElements`.
///
/// Returns `Ok(None)` for `pom` packaging.
pub fn build_module(project: &MavenProject, options: &GenerateOptions) -> Result<Option<Module>> {
    if project.is_pom_packaging() {
        return Ok(None);
    }

    let group_id = project.group_id()?;
    let artifact_id = project.artifact_id()?;
    let version = project.version()?;

    let status = if is_snapshot(version) {
        attributes::STATUS_INTEGRATION
    } else {
        attributes::STATUS_RELEASE
    };

    let file = File::from_artifact(
        published_file_name(
            artifact_id,
            version,
            options.classifier.as_deref(),
            &options.artifact,
        ),
        &options.artifact,
    )?;
    let capabilities = capabilities(project, group_id, artifact_id, version);

    let mut builder = ModuleBuilder::new(group_id, artifact_id, version)
        .component_attribute(attributes::STATUS, status)
        .created_by(CREATOR, &options.maven_version);

    for variant in JavaVariant::ALL {
        let dependencies = variant_dependencies(project, variant);
        tracing::debug!(
            "{}: {} dependencies",
            variant.name(),
            dependencies.len()
        );
        builder = builder.variant(
            VariantBuilder::new(variant.name())
                .attribute(attributes::CATEGORY, attributes::CATEGORY_LIBRARY)
                .attribute(attributes::BUNDLING, attributes::BUNDLING_EXTERNAL)
                .attribute(attributes::LIBRARY_ELEMENTS, attributes::LIBRARY_ELEMENTS_JAR)
                .attribute(attributes::USAGE, variant.usage())
                .dependencies(dependencies)
                .file(file.clone())
                .capabilities(capabilities.clone()),
        );
    }

    Ok(Some(builder.build()?))
}

fn variant_dependencies(project: &MavenProject, variant: JavaVariant) -> Vec<Dependency> {
    let config = &project.plugin_config;

    let declared = project.dependencies.iter().filter(|dep| {
        if dep.optional {
            // optional dependencies are ignored by all consumers
            return false;
        }
        if !variant.includes(&dep.effective_scope()) {
            return false;
        }
        if config.is_removed(dep) {
            tracing::debug!("{} is listed in removedDependencies", dep.name());
            return false;
        }
        true
    });

    let platforms = config
        .platform_dependencies
        .iter()
        .filter(|dep| dep.scope.as_ref().is_none_or(|scope| variant.includes(scope)));

    declared
        .map(to_dependency)
        .chain(platforms.map(|dep| to_dependency(dep).into_platform()))
        .collect()
}

fn to_dependency(dep: &MavenDependency) -> Dependency {
    let excludes = dep
        .exclusions
        .iter()
        .map(|e| Exclude {
            group: e.group_id.clone(),
            module: e.artifact_id.clone(),
        })
        .collect();

    let mut out = Dependency::new(&dep.group_id, &dep.artifact_id, dep.version.clone())
        .with_excludes(excludes);
    if dep.selects_artifact() {
        out = out.with_artifact_selector(ArtifactSelector {
            name: dep.artifact_id.clone(),
            kind: dep.dep_type.clone(),
            extension: None,
            classifier: dep.classifier.clone(),
        });
    }
    out
}

/// The component's own capability first, then the configured ones.
/// Empty unless capabilities are configured.
fn capabilities(
    project: &MavenProject,
    group_id: &str,
    artifact_id: &str,
    version: &str,
) -> Vec<Capability> {
    let configured = &project.plugin_config.capabilities;
    if configured.is_empty() {
        return Vec::new();
    }

    std::iter::once(Capability {
        group: group_id.to_string(),
        name: artifact_id.to_string(),
        version: version.to_string(),
    })
    .chain(configured.iter().map(|c| Capability {
        group: c.group_id.clone(),
        name: c.artifact_id.clone(),
        version: c.version.clone().unwrap_or_else(|| version.to_string()),
    }))
    .collect()
}

/// Name the artifact is published under: `{artifactId}-{version}[-{classifier}].{ext}`.
///
/// Files without an extension keep their own name.
pub fn published_file_name(
    artifact_id: &str,
    version: &str,
    classifier: Option<&str>,
    artifact: &Path,
) -> String {
    let file_name = artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let Some((_, extension)) = file_name.rsplit_once('.') else {
        return file_name;
    };

    match classifier.filter(|c| !c.is_empty()) {
        Some(classifier) => format!("{artifact_id}-{version}-{classifier}.{extension}"),
        None => format!("{artifact_id}-{version}.{extension}"),
    }
}
