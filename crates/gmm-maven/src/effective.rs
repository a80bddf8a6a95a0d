//! Effective project: a POM with its local parents, properties and
//! dependency management applied.
//!
//! This is the small part of Maven's model building that decides what ends
//! up in the published metadata. Remote parents and BOM imports are not
//! resolved.

use crate::error::Result;
use crate::interpolate::Interpolator;
use crate::parser::parse_pom_xml;
use crate::types::{MavenDependency, MavenProject, ParentRef, PluginConfig};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Parent chains deeper than this are cut off.
const MAX_PARENT_DEPTH: usize = 16;

const DEFAULT_RELATIVE_PATH: &str = "../pom.xml";

/// Loads the POM at `pom_path` and builds its effective project.
pub fn load_effective_project(pom_path: &Path) -> Result<MavenProject> {
    let project = load_with_parents(pom_path, 0)?;
    Ok(resolve(project))
}

fn load_with_parents(pom_path: &Path, depth: usize) -> Result<MavenProject> {
    let content = std::fs::read_to_string(pom_path)?;
    let mut project = parse_pom_xml(&content)?;
    tracing::debug!(
        "Parsed {:?}: {} dependencies",
        pom_path,
        project.dependencies.len()
    );

    let Some(parent_ref) = project.parent.clone() else {
        return Ok(project);
    };

    if depth >= MAX_PARENT_DEPTH {
        tracing::warn!(
            "Parent chain of {:?} exceeds {} levels, ignoring further parents",
            pom_path,
            MAX_PARENT_DEPTH
        );
    } else if let Some(parent_path) = locate_parent(pom_path, &parent_ref) {
        let parent = load_with_parents(&parent_path, depth + 1)?;
        if is_referenced_parent(&parent, &parent_ref) {
            tracing::debug!("Inheriting from parent {:?}", parent_path);
            project = inherit(project, parent);
        } else {
            tracing::warn!(
                "{:?} does not match the declared parent {}:{}",
                parent_path,
                parent_ref.group_id.as_deref().unwrap_or("?"),
                parent_ref.artifact_id.as_deref().unwrap_or("?")
            );
        }
    }

    // coordinates declared in <parent> apply even if the parent POM is not local
    if project.group_id.is_none() {
        project.group_id = parent_ref.group_id;
    }
    if project.version.is_none() {
        project.version = parent_ref.version;
    }
    Ok(project)
}

fn locate_parent(pom_path: &Path, parent: &ParentRef) -> Option<PathBuf> {
    let relative = parent
        .relative_path
        .as_deref()
        .unwrap_or(DEFAULT_RELATIVE_PATH);
    if relative.is_empty() {
        return None;
    }

    let base = pom_path.parent().unwrap_or_else(|| Path::new("."));
    let mut candidate = base.join(relative);
    if candidate.is_dir() {
        candidate = candidate.join("pom.xml");
    }

    if candidate.is_file() {
        Some(candidate)
    } else {
        tracing::debug!("Parent POM {:?} not found locally", candidate);
        None
    }
}

fn is_referenced_parent(parent: &MavenProject, reference: &ParentRef) -> bool {
    let same = |actual: &Option<String>, expected: &Option<String>| match expected {
        Some(expected) => actual.as_ref() == Some(expected),
        None => true,
    };
    same(&parent.group_id, &reference.group_id) && same(&parent.artifact_id, &reference.artifact_id)
}

fn inherit(child: MavenProject, parent: MavenProject) -> MavenProject {
    let mut properties = parent.properties;
    properties.extend(child.properties);

    MavenProject {
        group_id: child.group_id.or(parent.group_id),
        artifact_id: child.artifact_id,
        version: child.version.or(parent.version),
        packaging: child.packaging,
        parent: child.parent,
        properties,
        dependencies: merge_dependencies(child.dependencies, parent.dependencies),
        dependency_management: merge_dependencies(
            child.dependency_management,
            parent.dependency_management,
        ),
        plugin_config: inherit_plugin_config(child.plugin_config, parent.plugin_config),
        has_marker: child.has_marker,
    }
}

/// Child entries first, then parent entries the child does not redeclare.
fn merge_dependencies(
    child: Vec<MavenDependency>,
    parent: Vec<MavenDependency>,
) -> Vec<MavenDependency> {
    let declared: HashSet<_> = child.iter().map(MavenDependency::management_key).collect();
    let mut merged = child;
    merged.extend(
        parent
            .into_iter()
            .filter(|dep| !declared.contains(&dep.management_key())),
    );
    merged
}

fn inherit_plugin_config(child: PluginConfig, parent: PluginConfig) -> PluginConfig {
    PluginConfig {
        platform_dependencies: own_or_inherited(
            child.platform_dependencies,
            parent.platform_dependencies,
        ),
        capabilities: own_or_inherited(child.capabilities, parent.capabilities),
        removed_dependencies: own_or_inherited(
            child.removed_dependencies,
            parent.removed_dependencies,
        ),
    }
}

fn own_or_inherited<T>(own: Vec<T>, inherited: Vec<T>) -> Vec<T> {
    if own.is_empty() { inherited } else { own }
}

fn project_values(project: &MavenProject) -> HashMap<String, String> {
    let mut values = project.properties.clone();
    let mut put = |key: &str, value: Option<&str>| {
        if let Some(value) = value {
            for prefix in ["project", "pom"] {
                values.insert(format!("{prefix}.{key}"), value.to_string());
            }
        }
    };

    put("groupId", project.group_id.as_deref());
    put("artifactId", project.artifact_id.as_deref());
    put("version", project.version.as_deref());
    put("packaging", Some(project.packaging.as_str()));
    if let Some(parent) = &project.parent {
        put("parent.groupId", parent.group_id.as_deref());
        put("parent.artifactId", parent.artifact_id.as_deref());
        put("parent.version", parent.version.as_deref());
    }
    values
}

fn interpolate_dependency(interpolator: &Interpolator, dep: &mut MavenDependency) {
    dep.group_id = interpolator.interpolate(&dep.group_id);
    dep.artifact_id = interpolator.interpolate(&dep.artifact_id);
    dep.version = interpolator.interpolate_opt(dep.version.as_deref());
    dep.dep_type = interpolator.interpolate(&dep.dep_type);
    dep.classifier = interpolator.interpolate_opt(dep.classifier.as_deref());
    for exclusion in &mut dep.exclusions {
        exclusion.group_id = interpolator.interpolate(&exclusion.group_id);
        exclusion.artifact_id = interpolator.interpolate(&exclusion.artifact_id);
    }
}

/// Interpolates every value read from the POM and applies dependency management.
fn resolve(mut project: MavenProject) -> MavenProject {
    let interpolator = Interpolator::new(project_values(&project));

    project.group_id = interpolator.interpolate_opt(project.group_id.as_deref());
    project.artifact_id = interpolator.interpolate_opt(project.artifact_id.as_deref());
    project.version = interpolator.interpolate_opt(project.version.as_deref());

    let config = &mut project.plugin_config;
    for dep in project
        .dependencies
        .iter_mut()
        .chain(project.dependency_management.iter_mut())
        .chain(config.platform_dependencies.iter_mut())
        .chain(config.removed_dependencies.iter_mut())
    {
        interpolate_dependency(&interpolator, dep);
    }
    for capability in &mut config.capabilities {
        capability.group_id = interpolator.interpolate(&capability.group_id);
        capability.artifact_id = interpolator.interpolate(&capability.artifact_id);
        capability.version = interpolator.interpolate_opt(capability.version.as_deref());
    }

    apply_dependency_management(&mut project);
    project
}

fn apply_dependency_management(project: &mut MavenProject) {
    let managed: HashMap<_, _> = project
        .dependency_management
        .iter()
        .map(|dep| (dep.management_key(), dep))
        .collect();

    for dep in &mut project.dependencies {
        let Some(managed) = managed.get(&dep.management_key()) else {
            continue;
        };
        if dep.version.is_none() {
            dep.version.clone_from(&managed.version);
        }
        if dep.scope.is_none() {
            dep.scope.clone_from(&managed.scope);
        }
        if dep.exclusions.is_empty() {
            dep.exclusions.clone_from(&managed.exclusions);
        }
    }
}
