use crate::config::FilterConfig;
use crate::error::Result;
use crate::extractor::ExtractorRegistry;
use crate::scanner::{ExclusionSet, TreeWalker, WalkEntry, WalkResult};
use std::path::Path;

const INDENT: &str = "  ";

/// Renders the folder outline: one bold line per directory, one linked line
/// per supported file, indented two spaces per level.
pub struct StructureBuilder<'a> {
    registry: &'a ExtractorRegistry,
}

impl<'a> StructureBuilder<'a> {
    pub fn new(registry: &'a ExtractorRegistry) -> Self {
        Self { registry }
    }

    pub fn render(&self, walk: &WalkResult) -> String {
        let mut lines = Vec::new();

        for entry in &walk.entries {
            match entry {
                WalkEntry::Directory { name, depth, .. } => {
                    lines.push(format!("{}- **{}/**", INDENT.repeat(*depth), name));
                }
                WalkEntry::File(file) if self.registry.is_supported(&file.extension) => {
                    lines.push(format!(
                        "{}- [{}](#{})",
                        INDENT.repeat(file.depth + 1),
                        file.filename,
                        file.anchor()
                    ));
                }
                WalkEntry::File(_) => {}
            }
        }

        lines.join("\n")
    }
}

/// Walks `root` with the default filters and the given exclusions and
/// renders its outline, naming the root after its final path component.
pub fn build_structure(
    root: &Path,
    exclusions: &ExclusionSet,
    registry: &ExtractorRegistry,
) -> Result<String> {
    let walker = TreeWalker::new(&FilterConfig::default()).with_exclusions(exclusions.clone());
    let walk = walker.walk(root, &super::root_name(root))?;
    Ok(StructureBuilder::new(registry).render(&walk))
}
