//! Assembly of the combined Markdown document.
//!
//! [`Aggregator`] walks a folder, extracts and classifies every supported
//! file and streams the result into one `.md` file. [`ArchiveAdapter`] does
//! the same for a zip archive by unpacking it into a scratch directory first.

pub mod aggregator;
pub mod archive;
pub mod formatter;
pub mod markdown;
pub mod report;
pub mod structure;

pub use aggregator::{Aggregator, ProcessingProgress};
pub use archive::{is_zip_archive, ArchiveAdapter};
pub use formatter::{ContentFormatter, MarkdownBlock};
pub use report::ProcessReport;
pub use structure::{build_structure, StructureBuilder};

use std::path::Path;

/// Display name of a root directory: its final path component.
pub fn root_name(root: &Path) -> String {
    if let Some(name) = root.file_name() {
        return name.to_string_lossy().to_string();
    }

    // `.` and `..` have no file name until resolved.
    root.canonicalize()
        .ok()
        .and_then(|resolved| resolved.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| "root".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_root_name() {
        assert_eq!(root_name(Path::new("/data/projects/alpha")), "alpha");
        assert_eq!(root_name(Path::new("beta/")), "beta");

        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("gamma");
        std::fs::create_dir(&nested).unwrap();
        assert_eq!(root_name(&nested.join(".")), "gamma");
        assert_eq!(root_name(Path::new("/")), "root");
    }
}
