use crate::classifier::{Classifier, ContentClassification};
use crate::config::OutputConfig;
use crate::document::formatter::ContentFormatter;
use crate::document::report::ProcessReport;
use crate::document::structure::StructureBuilder;
use crate::error::{FolderDigestError, Result};
use crate::extractor::{ExtractorRegistry, FileType};
use crate::scanner::{FileEntry, SourceFile, TreeWalker, WalkEntry};
use crate::ui::OutputFormatter;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ProcessingProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub errors: Vec<String>,
}

impl ProcessingProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            current_file: None,
            start_time: Instant::now(),
            errors: Vec::new(),
        }
    }

    pub fn update_file(&mut self, filename: String) {
        self.files_processed += 1;
        self.current_file = Some(filename);
    }

    pub fn add_error<S: Into<String>>(&mut self, error: S) {
        self.errors.push(error.into());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn estimated_remaining(&self) -> Duration {
        if self.files_processed == 0 {
            return Duration::from_secs(0);
        }

        let rate = self.files_processed as f64 / self.elapsed().as_secs_f64();
        let remaining_files = self.total_files.saturating_sub(self.files_processed);

        if rate > 0.0 && rate.is_finite() {
            Duration::from_secs_f64(remaining_files as f64 / rate)
        } else {
            Duration::from_secs(0)
        }
    }
}

/// Combines every supported file below a root into one Markdown document.
///
/// The document is streamed: header and outline first, then one section per
/// file in walk order. A failure on a single file is reported and skipped;
/// only failing to create, start or flush the output aborts the run.
pub struct Aggregator<'a> {
    registry: &'a ExtractorRegistry,
    classifier: &'a dyn Classifier,
    walker: &'a TreeWalker,
    output: &'a OutputConfig,
    observer: &'a OutputFormatter,
    formatter: ContentFormatter,
}

impl<'a> Aggregator<'a> {
    pub fn new(
        registry: &'a ExtractorRegistry,
        classifier: &'a dyn Classifier,
        walker: &'a TreeWalker,
        output: &'a OutputConfig,
        observer: &'a OutputFormatter,
    ) -> Self {
        Self {
            registry,
            classifier,
            walker,
            output,
            observer,
            formatter: ContentFormatter::new(),
        }
    }

    /// `<base>/<prefix><name>.md`, or `<base>/<file_name>.md` when overridden.
    pub fn output_path(&self, name: &str) -> PathBuf {
        let stem = match self.output.file_name {
            Some(ref file_name) => file_name.trim_end_matches(".md").to_string(),
            None => format!("{}{}", self.output.file_prefix, name),
        };

        self.output.base_directory.join(format!("{}.md", stem))
    }

    /// Processes `root`, naming the document after the folder itself.
    pub fn process(
        &self,
        root: &Path,
        progress_callback: Option<&dyn Fn(&ProcessingProgress)>,
    ) -> Result<ProcessReport> {
        let name = super::root_name(root);
        self.process_named(root, &name, progress_callback)
    }

    pub fn process_named(
        &self,
        root: &Path,
        name: &str,
        progress_callback: Option<&dyn Fn(&ProcessingProgress)>,
    ) -> Result<ProcessReport> {
        let start_time = Instant::now();
        let output_path = self.output_path(name);

        let mut walk = self.walker.walk(root, name)?;
        self.drop_previous_output(&mut walk.entries, &output_path);

        for error in &walk.errors {
            self.observer.warning(error);
        }

        let structure = StructureBuilder::new(self.registry).render(&walk);
        let files: Vec<(&FileEntry, FileType)> = walk
            .files()
            .filter_map(|file| self.registry.lookup(&file.extension).map(|t| (file, t)))
            .collect();

        self.observer.debug(&format!(
            "Found {} supported files below {}",
            files.len(),
            root.display()
        ));

        let mut report = ProcessReport::new(name, output_path.clone());
        report.walk_errors = walk.errors.clone();

        let file = File::create(&output_path).map_err(|e| output_error(&output_path, e))?;
        let mut writer = BufWriter::new(file);

        write_header(&mut writer, name, &structure).map_err(|e| output_error(&output_path, e))?;

        let mut progress = ProcessingProgress::new(files.len());

        for (entry, file_type) in files {
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            match self.render_file(entry, file_type) {
                Ok(Some((classification, section))) => match writer.write_all(section.as_bytes()) {
                    Ok(()) => report.record_written(classification),
                    Err(e) => self.record_failure(entry, &e, &mut progress, &mut report),
                },
                Ok(None) => report.record_skipped(),
                Err(e) => self.record_failure(entry, &e, &mut progress, &mut report),
            }

            progress.update_file(entry.display_path());
        }

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        writer.flush().map_err(|e| output_error(&output_path, e))?;

        report.duration = start_time.elapsed();
        Ok(report)
    }

    /// Extracts, classifies and formats one file. `None` means the file had
    /// no content and is left out of the document.
    fn render_file(
        &self,
        entry: &FileEntry,
        file_type: FileType,
    ) -> Result<Option<(ContentClassification, String)>> {
        let content = self.registry.extract(file_type, &entry.path, self.observer);
        if content.is_empty() {
            self.observer
                .debug(&format!("Skipping {}: no content", entry.display_path()));
            return Ok(None);
        }

        let source = SourceFile::stat(entry)?;
        let classification = self.classifier.classify(&source.filename, &content);
        let block = self
            .formatter
            .format(&source, &content, classification, file_type.language);

        let section = format!(
            "<a id='{}'></a>\n### {}\n\n{}",
            entry.anchor(),
            entry.relative_path.display(),
            block
        );

        Ok(Some((classification, section)))
    }

    fn record_failure(
        &self,
        entry: &FileEntry,
        error: &dyn std::fmt::Display,
        progress: &mut ProcessingProgress,
        report: &mut ProcessReport,
    ) {
        let message = format!("Error processing file {}: {}", entry.path.display(), error);
        self.observer.error(&message);
        progress.add_error(message.clone());
        report.record_failure(message);
    }

    /// A document written into the folder it describes must not describe
    /// itself on the next run.
    fn drop_previous_output(&self, entries: &mut Vec<WalkEntry>, output_path: &Path) {
        let target = match resolve_output(output_path) {
            Some(target) => target,
            None => return,
        };

        entries.retain(|entry| match entry {
            WalkEntry::File(file) => fs::canonicalize(&file.path)
                .map(|resolved| resolved != target)
                .unwrap_or(true),
            WalkEntry::Directory { .. } => true,
        });
    }
}

fn resolve_output(output_path: &Path) -> Option<PathBuf> {
    let parent = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.canonicalize().ok()?,
        _ => std::env::current_dir().ok()?,
    };
    Some(parent.join(output_path.file_name()?))
}

fn write_header<W: Write>(writer: &mut W, name: &str, structure: &str) -> std::io::Result<()> {
    write!(writer, "# Contents of {}\n\n", name)?;
    writer.write_all(b"## Folder Structure\n")?;
    write!(writer, "{}\n\n", structure)?;
    writer.write_all(b"## File Contents\n\n")?;
    Ok(())
}

fn output_error(path: &Path, error: std::io::Error) -> FolderDigestError {
    FolderDigestError::Output {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}
