use anyhow::Result;
use clap::Parser;
use gmm_cli::{GenerateArgs, MarkArgs, ProjectArgs};
use tracing_subscriber::EnvFilter;

/// gmm - Gradle Module Metadata for Maven projects
///
/// Writes the module.json Gradle reads next to a published pom.xml.
///
/// Examples:
///   gmm mark --pom pom.xml
///   gmm generate --pom pom.xml --artifact target/lib-1.0.jar --maven-version 3.9.6
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output (overrides RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Write module.json for a project
    Generate(GenerateArgs),

    /// Build and validate module.json, printing it to stdout
    Check(ProjectArgs),

    /// Add the Gradle Module Metadata marker comment to a POM
    Mark(MarkArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate(args) => {
            gmm_cli::generate(&args)?;
        }
        Commands::Check(args) => {
            if let Some(json) = gmm_cli::check(&args)? {
                print!("{json}");
            }
        }
        Commands::Mark(args) => {
            gmm_cli::mark(&args)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_generate_parsing() {
        let cli = Cli::try_parse_from([
            "gmm",
            "generate",
            "--pom",
            "lib/pom.xml",
            "--artifact",
            "lib/target/lib.jar",
            "--maven-version",
            "3.9.6",
            "--output-dir",
            "/tmp/out",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.project.pom, PathBuf::from("lib/pom.xml"));
                assert_eq!(args.project.maven_version, "3.9.6");
                assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/out")));
            }
            _ => panic!("Expected Generate command"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_mark_default_pom() {
        let cli = Cli::try_parse_from(["gmm", "mark", "-v"]).unwrap();
        match cli.command {
            Commands::Mark(args) => assert_eq!(args.pom, PathBuf::from("pom.xml")),
            _ => panic!("Expected Mark command"),
        }
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_check_requires_artifact() {
        let result = Cli::try_parse_from(["gmm", "check", "--maven-version", "3.9.6"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["gmm"]).is_err());
    }
}
