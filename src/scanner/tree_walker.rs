use crate::config::FilterConfig;
use crate::error::{FolderDigestError, Result};
use crate::scanner::exclusion::ExclusionSet;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// One step of the depth-first walk.
#[derive(Debug, Clone, PartialEq)]
pub enum WalkEntry {
    Directory {
        name: String,
        relative_path: PathBuf,
        depth: usize,
    },
    File(FileEntry),
}

/// A regular file found by the walk, before its metadata is read.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub filename: String,
    pub extension: String,
    /// Depth of the containing directory (root is 0).
    pub depth: usize,
}

impl FileEntry {
    pub fn new(path: PathBuf, relative_path: PathBuf, depth: usize) -> Self {
        let filename = file_name_of(&path);
        let extension = extension_of(&path);

        Self {
            path,
            relative_path,
            filename,
            extension,
            depth,
        }
    }

    pub fn anchor(&self) -> String {
        crate::document::markdown::anchor_for(&self.relative_path)
    }

    pub fn display_path(&self) -> String {
        self.relative_path.display().to_string()
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub filename: String,
    pub extension: String,
    pub size: u64,
    pub modified: SystemTime,
}

impl SourceFile {
    pub fn new(path: PathBuf, relative_path: PathBuf, size: u64, modified: SystemTime) -> Self {
        let filename = file_name_of(&path);
        let extension = extension_of(&path);

        Self {
            path,
            relative_path,
            filename,
            extension,
            size,
            modified,
        }
    }

    /// Reads size and modification time for a walked file.
    pub fn stat(entry: &FileEntry) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(&entry.path)?;
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        Ok(Self::new(
            entry.path.clone(),
            entry.relative_path.clone(),
            metadata.len(),
            modified,
        ))
    }

    /// Extension with its leading dot, as shown in the metadata table.
    pub fn dotted_extension(&self) -> String {
        if self.extension.is_empty() {
            String::new()
        } else {
            format!(".{}", self.extension)
        }
    }

    pub fn display_path(&self) -> String {
        self.relative_path.display().to_string()
    }
}

#[derive(Debug, Default)]
pub struct WalkResult {
    pub entries: Vec<WalkEntry>,
    /// Entries that could not be read; the walk continues past them.
    pub errors: Vec<String>,
}

impl WalkResult {
    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            WalkEntry::File(file) => Some(file),
            WalkEntry::Directory { .. } => None,
        })
    }
}

/// Deterministic depth-first walker.
///
/// At every directory the regular files come first, then the
/// subdirectories, each group ordered by name. Excluded directories are
/// pruned before descending, so nothing below them is ever visited.
pub struct TreeWalker {
    exclusions: ExclusionSet,
    max_depth: usize,
    follow_links: bool,
}

impl TreeWalker {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            exclusions: ExclusionSet::from_config(config),
            max_depth: config.max_depth,
            follow_links: config.follow_links,
        }
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Walks `root`, naming the root directory entry `root_name`.
    pub fn walk<P: AsRef<Path>>(&self, root: P, root_name: &str) -> Result<WalkResult> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(FolderDigestError::InvalidPath {
                path: root_path.display().to_string(),
            });
        }

        if !root_path.is_dir() {
            return Err(FolderDigestError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut result = WalkResult::default();

        let walker = WalkDir::new(root_path)
            .max_depth(self.max_depth)
            .follow_links(self.follow_links)
            .sort_by(files_before_directories)
            .into_iter()
            .filter_entry(|e| self.should_traverse(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if err.depth() == 0 {
                        return Err(err.into());
                    }
                    result.errors.push(format!("Walk error: {}", err));
                    continue;
                }
            };

            let relative_path = match entry.path().strip_prefix(root_path) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => {
                    result.errors.push(format!(
                        "Cannot calculate relative path for {} from root {}",
                        entry.path().display(),
                        root_path.display()
                    ));
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                if entry.depth() == self.max_depth && has_children(entry.path()) {
                    result.errors.push(format!(
                        "Depth limit {} reached at {}; its contents are skipped",
                        self.max_depth,
                        relative_path.display()
                    ));
                }

                let name = if entry.depth() == 0 {
                    root_name.to_string()
                } else {
                    file_name_of(entry.path())
                };

                result.entries.push(WalkEntry::Directory {
                    name,
                    relative_path,
                    depth: entry.depth(),
                });
            } else if entry.file_type().is_file() {
                result.entries.push(WalkEntry::File(FileEntry::new(
                    entry.path().to_path_buf(),
                    relative_path,
                    entry.depth().saturating_sub(1),
                )));
            } else if entry.path_is_symlink() {
                // Links to files are read through; linked directories are not descended.
                match std::fs::metadata(entry.path()) {
                    Ok(metadata) if metadata.is_file() => {
                        result.entries.push(WalkEntry::File(FileEntry::new(
                            entry.path().to_path_buf(),
                            relative_path,
                            entry.depth().saturating_sub(1),
                        )));
                    }
                    Ok(_) => {}
                    Err(err) => result.errors.push(format!(
                        "Broken link {}: {}",
                        relative_path.display(),
                        err
                    )),
                }
            }
        }

        Ok(result)
    }

    fn should_traverse(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }

        if entry.file_type().is_dir() {
            return self.exclusions.should_traverse_directory(entry.path());
        }

        true
    }
}

fn files_before_directories(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn has_children(path: &Path) -> bool {
    std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
