pub mod classifier;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use classifier::{Classifier, ContentClassification, RuleClassifier};
pub use cli::{Cli, OutputFormat};
pub use config::{ClassifierConfig, CliOverrides, Config, FilterConfig, OutputConfig};
pub use error::{FolderDigestError, Result, UserFriendlyError};

// Core functionality re-exports
pub use document::{
    build_structure, is_zip_archive, Aggregator, ArchiveAdapter, ContentFormatter,
    ProcessReport, ProcessingProgress, StructureBuilder,
};
pub use extractor::{ExtractorKind, ExtractorRegistry, FileType};
pub use scanner::{ExclusionSet, FileEntry, SourceFile, TreeWalker, WalkEntry};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};

/// What a run would produce, computed without writing anything.
#[derive(Debug, Clone)]
pub struct DigestPlan {
    pub name: String,
    pub output_path: PathBuf,
    pub structure: String,
    pub files: Vec<String>,
    pub archive: bool,
}

/// Main library interface: turns a folder or zip archive into one Markdown document.
pub struct FolderDigest {
    config: Config,
    registry: ExtractorRegistry,
    classifier: Box<dyn Classifier>,
    walker: TreeWalker,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl FolderDigest {
    /// Create a new FolderDigest instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        config.validate()?;

        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);
        let classifier = Box::new(RuleClassifier::new(&config.classifier));
        let walker = TreeWalker::new(&config.filters);

        Ok(Self {
            config,
            registry: ExtractorRegistry::with_defaults(),
            classifier,
            walker,
            output_formatter,
            progress_manager,
        })
    }

    /// Create FolderDigest instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Swap in another classification policy.
    pub fn with_classifier(mut self, classifier: Box<dyn Classifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Dispatches on the input kind: directories are aggregated directly,
    /// zip archives through a scratch directory.
    pub fn process_path<P: AsRef<Path>>(&self, path: P) -> Result<ProcessReport> {
        let path = self.resolve_input(path.as_ref())?;

        if path.is_dir() {
            self.process_folder(&path)
        } else if is_zip_archive(&path) {
            self.process_archive(&path)
        } else {
            Err(FolderDigestError::UnsupportedInput {
                path: path.display().to_string(),
            })
        }
    }

    pub fn process_folder(&self, root: &Path) -> Result<ProcessReport> {
        self.output_formatter
            .start_operation(&format!("Combining folder {}", root.display()));

        let aggregator = self.aggregator();
        let report = self.run_with_progress(|callback| aggregator.process(root, Some(callback)))?;

        self.output_formatter.success(&format!(
            "Combined {} files into {}",
            report.files_written,
            report.output_path.display()
        ));

        Ok(report)
    }

    pub fn process_archive(&self, zip_path: &Path) -> Result<ProcessReport> {
        self.output_formatter
            .start_operation(&format!("Combining archive {}", zip_path.display()));

        let aggregator = self.aggregator();
        let spinner = self
            .progress_manager
            .create_spinner(&format!("Unpacking {}", zip_path.display()));
        let adapter = ArchiveAdapter::new(&self.output_formatter).with_spinner(spinner);
        let report = self.run_with_progress(|callback| {
            adapter.process(&aggregator, zip_path, Some(callback))
        })?;

        self.output_formatter.success(&format!(
            "Combined {} files from {} into {}",
            report.files_written,
            zip_path.display(),
            report.output_path.display()
        ));

        Ok(report)
    }

    /// Walks the input and reports the outline and target document without
    /// extracting or writing anything.
    pub fn plan<P: AsRef<Path>>(&self, path: P) -> Result<DigestPlan> {
        let path = self.resolve_input(path.as_ref())?;

        if path.is_dir() {
            self.plan_folder(&path, &document::root_name(&path), false)
        } else if is_zip_archive(&path) {
            ArchiveAdapter::new(&self.output_formatter)
                .with_extracted(&path, |root, name| self.plan_folder(root, name, true))
        } else {
            Err(FolderDigestError::UnsupportedInput {
                path: path.display().to_string(),
            })
        }
    }

    fn plan_folder(&self, root: &Path, name: &str, archive: bool) -> Result<DigestPlan> {
        let walk = self.walker.walk(root, name)?;
        let structure = StructureBuilder::new(&self.registry).render(&walk);
        let files = walk
            .files()
            .filter(|file| self.registry.is_supported(&file.extension))
            .map(FileEntry::display_path)
            .collect();

        Ok(DigestPlan {
            name: name.to_string(),
            output_path: self.aggregator().output_path(name),
            structure,
            files,
            archive,
        })
    }

    fn resolve_input(&self, path: &Path) -> Result<PathBuf> {
        if !path.exists() {
            return Err(FolderDigestError::InvalidPath {
                path: path.display().to_string(),
            });
        }

        Ok(path.canonicalize()?)
    }

    fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(
            &self.registry,
            self.classifier.as_ref(),
            &self.walker,
            &self.config.output,
            &self.output_formatter,
        )
    }

    fn run_with_progress<F>(&self, run: F) -> Result<ProcessReport>
    where
        F: FnOnce(&dyn Fn(&ProcessingProgress)) -> Result<ProcessReport>,
    {
        let file_progress = self.progress_manager.create_file_progress(0);
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &ProcessingProgress| {
                pb.set_length(progress.total_files as u64);
                ui::progress::update_file_progress(&pb, progress);
            }
        };

        let result = run(&progress_callback);

        match result {
            Ok(ref report) => ui::progress::finish_progress_with_summary(
                &file_progress,
                &format!("Processed {} files", report.files_written),
                report.duration,
            ),
            Err(_) => file_progress.abandon(),
        }
        self.progress_manager.clear();

        result
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &FolderDigestError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Convenience function to combine a folder or archive with default settings
pub fn digest_simple(input: &Path, output_dir: Option<&Path>) -> Result<ProcessReport> {
    let mut config = Config::default();

    if let Some(output_path) = output_dir {
        config.output.base_directory = output_path.to_path_buf();
    }

    FolderDigest::new(config, OutputMode::Plain, 0, true)?.process_path(input)
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
