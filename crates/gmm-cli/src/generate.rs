//! The `generate`, `check` and `mark` commands.

use crate::config::{GenerateArgs, MarkArgs, ProjectArgs};
use anyhow::{Context, Result};
use gmm_core::{Module, to_json};
use gmm_maven::{insert_marker, module_for_pom};
use std::io::Write;
use std::path::{Path, PathBuf};

fn build(project: &ProjectArgs) -> Result<Option<Module>> {
    module_for_pom(&project.pom, &project.options()).with_context(|| {
        format!(
            "Failed to build module metadata for {}",
            project.pom.display()
        )
    })
}

/// Writes `module.json` for the project.
///
/// Returns the written path, or `None` when the project has no module metadata.
pub fn generate(args: &GenerateArgs) -> Result<Option<PathBuf>> {
    let Some(module) = build(&args.project)? else {
        return Ok(None);
    };
    let json = to_json(&module)?;

    let path = args.output_file();
    write_atomically(&path, json.as_bytes())?;
    tracing::info!("Wrote Gradle Module Metadata to {}", path.display());
    Ok(Some(path))
}

/// Builds and validates the module without writing it.
///
/// Returns the JSON document, or `None` when the project has no module metadata.
pub fn check(project: &ProjectArgs) -> Result<Option<String>> {
    let Some(module) = build(project)? else {
        return Ok(None);
    };
    Ok(Some(to_json(&module)?))
}

/// Adds the marker comment to the POM. Returns `false` if it was already there.
pub fn mark(args: &MarkArgs) -> Result<bool> {
    let content = std::fs::read_to_string(&args.pom)
        .with_context(|| format!("Failed to read {}", args.pom.display()))?;

    let marked = insert_marker(&content)
        .with_context(|| format!("Failed to add the marker to {}", args.pom.display()))?;
    let Some(marked) = marked else {
        tracing::info!("{} already carries the marker", args.pom.display());
        return Ok(false);
    };
    write_atomically(&args.pom, marked.as_bytes())?;
    tracing::info!("Added Gradle Module Metadata marker to {}", args.pom.display());
    Ok(true)
}

/// Replaces `path` with `content` through a temporary file in the same directory.
fn write_atomically(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(content)?;
    // temporary files are private; the result keeps the replaced file's mode
    let permissions = match std::fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => new_file_permissions(),
    };
    if let Some(permissions) = permissions {
        file.as_file().set_permissions(permissions)?;
    }
    file.as_file().sync_all()?;
    file.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<std::fs::Permissions> {
    None
}
