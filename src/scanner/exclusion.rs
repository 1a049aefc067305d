use crate::config::FilterConfig;
use std::collections::BTreeSet;
use std::path::Path;

/// Folder basenames pruned from traversal at every level.
///
/// Matching is exact and case-sensitive: `venv` excludes `venv/` but not
/// `Venv/` or `my_venv/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    names: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.exclude_dirs.iter().cloned())
    }

    pub fn is_excluded_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn should_traverse_directory(&self, path: &Path) -> bool {
        match path.file_name().and_then(|s| s.to_str()) {
            Some(dir_name) => !self.is_excluded_name(dir_name),
            None => true,
        }
    }
}
