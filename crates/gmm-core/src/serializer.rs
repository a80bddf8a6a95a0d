//! Gradle Module Metadata JSON rendering.
//!
//! Output is pretty-printed with two-space indentation and ends with a
//! newline. Key order follows the model's field order and attribute maps are
//! sorted, so identical modules always produce identical bytes.

use crate::error::{GmmError, Result};
use crate::model::Module;
use std::io::Write;

/// Renders `module` as a Gradle Module Metadata document.
///
/// # Errors
///
/// Returns `GmmError::Serialization` if a field the format requires is
/// empty or absent.
pub fn to_json(module: &Module) -> Result<String> {
    check_required(module)?;
    let mut json = serde_json::to_string_pretty(module)?;
    json.push('\n');
    Ok(json)
}

/// Streams the same bytes as [`to_json`] into `writer`.
pub fn write_to<W: Write>(module: &Module, mut writer: W) -> Result<()> {
    check_required(module)?;
    serde_json::to_writer_pretty(&mut writer, module)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Parses a Gradle Module Metadata document and validates the result.
pub fn from_json(json: &str) -> Result<Module> {
    let module: Module = serde_json::from_str(json)?;
    module.validate()?;
    Ok(module)
}

fn check_required(module: &Module) -> Result<()> {
    present("formatVersion", &module.format_version)?;
    present("component.group", &module.component.group)?;
    present("component.module", &module.component.module)?;
    present("component.version", &module.component.version)?;

    for (tool, creator) in &module.created_by {
        present(&format!("createdBy.{tool}.version"), &creator.version)?;
    }

    for variant in &module.variants {
        present("variants[].name", &variant.name)?;
        let at = |field: &str| format!("variants[{}].{field}", variant.name);

        for dep in &variant.dependencies {
            present(&at("dependencies[].group"), &dep.group)?;
            present(&at("dependencies[].module"), &dep.module)?;
            for exclude in &dep.excludes {
                present(&at("dependencies[].excludes[].group"), &exclude.group)?;
                present(&at("dependencies[].excludes[].module"), &exclude.module)?;
            }
            if let Some(compat) = &dep.third_party_compatibility {
                let selector = &compat.artifact_selector;
                present(&at("dependencies[].artifactSelector.name"), &selector.name)?;
                present(&at("dependencies[].artifactSelector.type"), &selector.kind)?;
            }
        }
        for constraint in &variant.dependency_constraints {
            present(&at("dependencyConstraints[].group"), &constraint.group)?;
            present(&at("dependencyConstraints[].module"), &constraint.module)?;
        }
        for file in &variant.files {
            present(&at("files[].name"), &file.name)?;
            present(&at("files[].url"), &file.url)?;
        }
        for capability in &variant.capabilities {
            present(&at("capabilities[].group"), &capability.group)?;
            present(&at("capabilities[].name"), &capability.name)?;
            present(&at("capabilities[].version"), &capability.version)?;
        }
    }

    Ok(())
}

fn present(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(GmmError::missing(field));
    }
    Ok(())
}
