use crate::extractor::{office, pdf, text, ExtractionError};
use crate::ui::OutputFormatter;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    Pdf,
    Presentation,
    WordDocument,
    PlainText,
    SourceCode,
}

impl ExtractorKind {
    pub fn extract(self, path: &Path) -> Result<String, ExtractionError> {
        match self {
            ExtractorKind::Pdf => pdf::extract_pdf(path),
            ExtractorKind::Presentation => office::extract_pptx(path),
            ExtractorKind::WordDocument => office::extract_docx(path),
            ExtractorKind::PlainText | ExtractorKind::SourceCode => text::read_text(path),
        }
    }

    /// Text substituted for the content when extraction fails.
    pub fn inline_error(self, error: &ExtractionError) -> String {
        match self {
            ExtractorKind::Pdf => format!("Error extracting PDF content: {}", error),
            ExtractorKind::Presentation => format!("Error extracting PPTX content: {}", error),
            ExtractorKind::WordDocument => format!("Error extracting DOCX content: {}", error),
            ExtractorKind::PlainText => format!("Error reading text file: {}", error),
            ExtractorKind::SourceCode => format!("Error reading code file: {}", error),
        }
    }

    fn label(self) -> &'static str {
        match self {
            ExtractorKind::Pdf => "PDF",
            ExtractorKind::Presentation => "PPTX",
            ExtractorKind::WordDocument => "DOCX",
            ExtractorKind::PlainText => "text",
            ExtractorKind::SourceCode => "code",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileType {
    pub kind: ExtractorKind,
    /// Fence language tag; `None` renders an untagged fence.
    pub language: Option<&'static str>,
}

/// Extension to extractor mapping, keyed by lower-case extension without the dot.
#[derive(Debug, Clone, Default)]
pub struct ExtractorRegistry {
    types: BTreeMap<String, FileType>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        use ExtractorKind::*;

        let mut registry = Self::new();
        registry.register("pdf", Pdf, None);
        registry.register("pptx", Presentation, None);
        registry.register("docx", WordDocument, None);
        registry.register("txt", PlainText, None);

        for (extension, language) in [
            ("py", "python"),
            ("java", "java"),
            ("js", "javascript"),
            ("cpp", "cpp"),
            ("sql", "sql"),
            ("json", "json"),
            ("yaml", "yaml"),
            ("yml", "yaml"),
            ("xml", "xml"),
            ("html", "html"),
            ("css", "css"),
            ("md", "markdown"),
        ] {
            registry.register(extension, SourceCode, Some(language));
        }

        registry
    }

    pub fn register<S: AsRef<str>>(
        &mut self,
        extension: S,
        kind: ExtractorKind,
        language: Option<&'static str>,
    ) {
        let extension = extension.as_ref().trim_start_matches('.').to_lowercase();
        self.types.insert(extension, FileType { kind, language });
    }

    pub fn lookup(&self, extension: &str) -> Option<FileType> {
        self.types
            .get(extension.trim_start_matches('.').to_lowercase().as_str())
            .copied()
    }

    pub fn is_supported(&self, extension: &str) -> bool {
        self.lookup(extension).is_some()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Runs the extractor for `file_type`, turning failures into inline text.
    pub fn extract(&self, file_type: FileType, path: &Path, observer: &OutputFormatter) -> String {
        match file_type.kind.extract(path) {
            Ok(content) => content,
            Err(err) => {
                observer.warning(&format!(
                    "Error extracting {} content from {}: {}",
                    file_type.kind.label(),
                    path.display(),
                    err
                ));
                file_type.kind.inline_error(&err)
            }
        }
    }
}
