//! Errors specific to reading Maven projects.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MavenError {
    #[error("Failed to parse pom.xml: {message}")]
    ParseError { message: String },

    #[error("Project has no {field}")]
    MissingCoordinate { field: &'static str },

    #[error(
        "Please add the Gradle Module Metadata marker '<!-- {marker} -->' to {}",
        path.display()
    )]
    MissingMarker { marker: &'static str, path: PathBuf },

    #[error(transparent)]
    Metadata(#[from] gmm_core::GmmError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MavenError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MavenError>;
