//! Marker comment that tells Gradle to look for module metadata.
//!
//! Gradle only fetches `module.json` for a Maven module if its POM carries
//! this comment, so publishing without it would silently drop the metadata.

use crate::error::{MavenError, Result};
use std::path::Path;

pub const MARKER: &str = "do_not_remove: published-with-gradle-metadata";

pub fn has_marker(content: &str) -> bool {
    content.lines().any(|line| line.contains(MARKER))
}

/// Fails unless the POM at `pom_path` contains the marker comment.
pub fn ensure_marker(pom_path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(pom_path)?;
    if has_marker(&content) {
        return Ok(());
    }
    Err(MavenError::MissingMarker {
        marker: MARKER,
        path: std::path::absolute(pom_path).unwrap_or_else(|_| pom_path.to_path_buf()),
    })
}

/// Returns `content` with the marker comment placed after `</modelVersion>`.
///
/// Returns `Ok(None)` if the marker is already present. POMs without a
/// `<modelVersion>` element get the comment after the opening `<project>` tag.
///
/// # Errors
///
/// Returns `MavenError::ParseError` if `content` has no `<project>` element.
pub fn insert_marker(content: &str) -> Result<Option<String>> {
    if has_marker(content) {
        return Ok(None);
    }
    let comment = format!(" <!-- {MARKER} -->");

    if let Some(pos) = content.find("</modelVersion>") {
        let at = pos + "</modelVersion>".len();
        let mut out = String::with_capacity(content.len() + comment.len());
        out.push_str(&content[..at]);
        out.push_str(&comment);
        out.push_str(&content[at..]);
        return Ok(Some(out));
    }

    let at = project_tag_end(content)
        .ok_or_else(|| MavenError::parse("no <project> element to add the marker to"))?;
    let mut out = String::with_capacity(content.len() + comment.len());
    out.push_str(&content[..at]);
    out.push_str(&comment);
    out.push_str(&content[at..]);
    Ok(Some(out))
}

/// Byte offset just past the opening `<project ...>` tag.
fn project_tag_end(content: &str) -> Option<usize> {
    let start = content.find("<project")?;
    Some(start + content[start..].find('>')? + 1)
}
