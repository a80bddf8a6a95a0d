//! Command line options and how they resolve into [`GenerateOptions`].

use gmm_maven::GenerateOptions;
use std::path::{Path, PathBuf};

/// Output location relative to the POM's directory, as used by Maven publications.
pub const DEFAULT_OUTPUT_DIR: &str = "target/publications/maven";

/// Name of the written document.
pub const MODULE_FILE_NAME: &str = "module.json";

/// Options shared by every command that builds a module.
#[derive(clap::Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project POM
    #[arg(long, value_name = "PATH", default_value = "pom.xml")]
    pub pom: PathBuf,

    /// Built main artifact of the project
    #[arg(long, value_name = "PATH")]
    pub artifact: PathBuf,

    /// Classifier of the main artifact (also via GMM_CLASSIFIER)
    #[arg(long, env = "GMM_CLASSIFIER", value_name = "CLASSIFIER")]
    pub classifier: Option<String>,

    /// Maven version recorded under createdBy (also via GMM_MAVEN_VERSION)
    #[arg(long, env = "GMM_MAVEN_VERSION", value_name = "VERSION")]
    pub maven_version: String,
}

impl ProjectArgs {
    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            maven_version: self.maven_version.clone(),
            artifact: self.artifact.clone(),
            classifier: self.classifier.clone().filter(|c| !c.is_empty()),
            require_marker: true,
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Directory module.json is written to (also via GMM_OUTPUT_DIR)
    /// [default: <pom dir>/target/publications/maven]
    #[arg(long, env = "GMM_OUTPUT_DIR", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl GenerateArgs {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir(&self.project.pom))
    }

    pub fn output_file(&self) -> PathBuf {
        self.output_dir().join(MODULE_FILE_NAME)
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct MarkArgs {
    /// POM to add the marker comment to
    #[arg(long, value_name = "PATH", default_value = "pom.xml")]
    pub pom: PathBuf,
}

pub fn default_output_dir(pom: &Path) -> PathBuf {
    pom.parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_OUTPUT_DIR)
}
