use crate::document::aggregator::{Aggregator, ProcessingProgress};
use crate::document::report::ProcessReport;
use crate::error::{FolderDigestError, Result};
use crate::ui::OutputFormatter;
use chrono::{Local, NaiveDate, TimeZone};
use filetime::FileTime;
use indicatif::ProgressBar;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use zip::result::ZipError;
use zip::ZipArchive;

const LOCAL_HEADER: &[u8; 4] = b"PK\x03\x04";
const EMPTY_ARCHIVE: &[u8; 4] = b"PK\x05\x06";

/// True when `path` is a file starting with a zip signature, or carries a
/// `.zip` extension.
pub fn is_zip_archive(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    let has_zip_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));

    let mut signature = [0u8; 4];
    let has_signature = File::open(path)
        .and_then(|mut file| file.read_exact(&mut signature))
        .map(|_| &signature == LOCAL_HEADER || &signature == EMPTY_ARCHIVE)
        .unwrap_or(false);

    has_zip_extension || has_signature
}

/// Unpacks a zip archive into a private scratch directory, runs the folder
/// pipeline on it and removes the scratch directory on every exit path.
pub struct ArchiveAdapter<'a> {
    observer: &'a OutputFormatter,
    scratch_root: Option<PathBuf>,
    spinner: Option<ProgressBar>,
}

impl<'a> ArchiveAdapter<'a> {
    pub fn new(observer: &'a OutputFormatter) -> Self {
        Self {
            observer,
            scratch_root: None,
            spinner: None,
        }
    }

    /// Spinner shown while the archive is unpacked; cleared once it is done.
    pub fn with_spinner(mut self, spinner: ProgressBar) -> Self {
        self.spinner = Some(spinner);
        self
    }

    /// Creates scratch directories below `root` instead of the system temp dir.
    pub fn with_scratch_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Aggregates the archive contents into one document named after the
    /// archive's file stem.
    pub fn process(
        &self,
        aggregator: &Aggregator<'_>,
        zip_path: &Path,
        progress_callback: Option<&dyn Fn(&ProcessingProgress)>,
    ) -> Result<ProcessReport> {
        self.with_extracted(zip_path, |root, name| {
            aggregator.process_named(root, name, progress_callback)
        })
    }

    /// Runs `f` on the unpacked archive. The scratch directory is removed
    /// before returning, whether `f` succeeded or not.
    pub fn with_extracted<T, F>(&self, zip_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&Path, &str) -> Result<T>,
    {
        let name = archive_name(zip_path);
        let scratch = match self.scratch_root {
            Some(ref root) => tempfile::Builder::new()
                .prefix("folder-digest-")
                .tempdir_in(root)?,
            None => tempfile::Builder::new().prefix("folder-digest-").tempdir()?,
        };

        self.observer.debug(&format!(
            "Unpacking {} into {}",
            zip_path.display(),
            scratch.path().display()
        ));

        let extracted = extract_archive(zip_path, scratch.path(), self.observer);
        if let Some(ref spinner) = self.spinner {
            spinner.finish_and_clear();
        }

        let result = extracted.and_then(|count| {
                self.observer
                    .debug(&format!("Unpacked {} files from {}", count, zip_path.display()));
                f(scratch.path(), &name)
            });

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            self.observer.warning(&format!(
                "Failed to remove scratch directory {}: {}",
                scratch_path.display(),
                e
            ));
        }

        result
    }
}

/// Archive file name without its final extension.
pub fn archive_name(zip_path: &Path) -> String {
    zip_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "archive".to_string())
}

/// Unpacks every entry of `zip_path` below `destination`, restoring file
/// modification times. Entries whose names would escape `destination` are
/// skipped with a warning.
pub fn extract_archive(
    zip_path: &Path,
    destination: &Path,
    observer: &OutputFormatter,
) -> Result<usize> {
    let file = File::open(zip_path).map_err(|e| FolderDigestError::InvalidPath {
        path: format!("{}: {}", zip_path.display(), e),
    })?;
    let mut archive = ZipArchive::new(file)?;
    let mut extracted = 0;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;

        let relative = match entry.enclosed_name() {
            Some(relative) => relative,
            None => {
                observer.warning(&format!("Skipping unsafe archive entry: {}", entry.name()));
                continue;
            }
        };
        let target = destination.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(archive_io)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(archive_io)?;
        }

        let mut output = File::create(&target).map_err(archive_io)?;
        io::copy(&mut entry, &mut output).map_err(archive_io)?;
        drop(output);

        if let Some(modified) = entry.last_modified().and_then(zip_time_to_system) {
            if let Err(e) = filetime::set_file_mtime(&target, FileTime::from_system_time(modified))
            {
                observer.debug(&format!(
                    "Could not restore modification time of {}: {}",
                    target.display(),
                    e
                ));
            }
        }

        extracted += 1;
    }

    Ok(extracted)
}

fn archive_io(error: io::Error) -> FolderDigestError {
    ZipError::Io(error).into()
}

/// Zip timestamps are local wall-clock times without a zone.
fn zip_time_to_system(time: zip::DateTime) -> Option<SystemTime> {
    let naive = NaiveDate::from_ymd_opt(time.year().into(), time.month().into(), time.day().into())?
        .and_hms_opt(time.hour().into(), time.minute().into(), time.second().into())?;
    let local = Local.from_local_datetime(&naive).earliest()?;
    Some(SystemTime::from(local))
}
