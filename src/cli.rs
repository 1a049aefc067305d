use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "folder-digest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Combine a folder or zip archive into a single Markdown document")]
#[command(
    long_about = "folder-digest walks a folder (or unpacks a zip archive), extracts the text of \
                  every PDF, Word, PowerPoint, plain-text and source file it finds, and writes \
                  everything into one Markdown document with a linked folder outline."
)]
#[command(after_help = "EXAMPLES:\n  \
    folder-digest ./project\n  \
    folder-digest reports.zip --output-dir ~/digests\n  \
    folder-digest ./project --exclude node_modules target .git\n  \
    folder-digest ./project -o handbook --config my-config.toml\n  \
    folder-digest --generate-config")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Folder or zip archive to combine
    #[arg(required_unless_present = "generate_config")]
    pub path: Option<PathBuf>,

    /// Folder names to skip at any depth (replaces the defaults)
    #[arg(short, long, num_args = 1.., value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Output document name without extension (defaults to combined_{name})
    #[arg(short, long)]
    pub output: Option<String>,

    /// Directory the document is written to (defaults to the current directory)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show the outline and target file without writing anything)
    #[arg(long, help = "Show what would be combined without writing the document")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_exclude(self.exclude.clone())
            .with_output_dir(self.output_dir.clone())
            .with_output_name(self.output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["folder-digest", "./project"]).unwrap();
        assert_eq!(cli.path.as_deref(), Some(Path::new("./project")));
        assert!(cli.exclude.is_none());
        assert!(!cli.dry_run);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_exclude_accepts_lists() {
        let cli =
            Cli::try_parse_from(["folder-digest", "proj", "--exclude", "node_modules", "target"])
                .unwrap();
        assert_eq!(
            cli.exclude,
            Some(vec!["node_modules".to_string(), "target".to_string()])
        );

        let cli = Cli::try_parse_from(["folder-digest", "proj", "-e", "a,b"]).unwrap();
        assert_eq!(cli.exclude, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_exclusion_override_replaces_defaults() {
        let cli = Cli::try_parse_from(["folder-digest", "proj", "--exclude", "build"]).unwrap();
        let mut config = Config::default();
        config.merge_with_cli_args(&cli.create_cli_overrides());

        assert_eq!(config.filters.exclude_dirs, vec!["build".to_string()]);
    }

    #[test]
    fn test_output_overrides() {
        let cli = Cli::try_parse_from([
            "folder-digest",
            "proj",
            "-o",
            "handbook",
            "--output-dir",
            "/tmp/digests",
        ])
        .unwrap();
        let mut config = Config::default();
        config.merge_with_cli_args(&cli.create_cli_overrides());

        assert_eq!(config.output.file_name.as_deref(), Some("handbook"));
        assert_eq!(config.output.base_directory, PathBuf::from("/tmp/digests"));
    }

    #[test]
    fn test_path_required_unless_generating_config() {
        assert!(Cli::try_parse_from(["folder-digest", "--dry-run"]).is_err());

        let cli = Cli::try_parse_from(["folder-digest", "--generate-config"]).unwrap();
        assert!(cli.generate_config);
        assert!(cli.path.is_none());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["folder-digest", "proj", "-q", "-v"]).is_err());

        let cli = Cli::try_parse_from(["folder-digest", "proj", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }
}
