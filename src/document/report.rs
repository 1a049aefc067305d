use crate::classifier::ContentClassification;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one aggregation run.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub name: String,
    pub output_path: PathBuf,
    pub files_written: usize,
    /// Supported files whose extracted content was empty.
    pub files_skipped: usize,
    pub files_failed: usize,
    pub classifications: BTreeMap<String, usize>,
    pub walk_errors: Vec<String>,
    pub errors: Vec<String>,
    pub duration: Duration,
}

impl ProcessReport {
    pub fn new<S: Into<String>>(name: S, output_path: PathBuf) -> Self {
        Self {
            name: name.into(),
            output_path,
            files_written: 0,
            files_skipped: 0,
            files_failed: 0,
            classifications: BTreeMap::new(),
            walk_errors: Vec::new(),
            errors: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    pub fn record_written(&mut self, classification: ContentClassification) {
        self.files_written += 1;
        *self
            .classifications
            .entry(classification.as_str().to_string())
            .or_insert(0) += 1;
    }

    pub fn record_skipped(&mut self) {
        self.files_skipped += 1;
    }

    pub fn record_failure<S: Into<String>>(&mut self, error: S) {
        self.files_failed += 1;
        self.errors.push(error.into());
    }

    pub fn has_issues(&self) -> bool {
        !self.errors.is_empty() || !self.walk_errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut report = ProcessReport::new("alpha", PathBuf::from("combined_alpha.md"));
        report.record_written(ContentClassification::SourceCode);
        report.record_written(ContentClassification::SourceCode);
        report.record_written(ContentClassification::Documentation);
        report.record_skipped();
        report.record_failure("Error processing file a.txt: denied");

        assert_eq!(report.files_written, 3);
        assert_eq!(report.files_skipped, 1);
        assert_eq!(report.files_failed, 1);
        assert_eq!(report.classifications["source_code"], 2);
        assert_eq!(report.classifications["documentation"], 1);
        assert!(report.has_issues());
    }

    #[test]
    fn test_serializes_to_json() {
        let mut report = ProcessReport::new("alpha", PathBuf::from("out/combined_alpha.md"));
        report.record_written(ContentClassification::Log);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["name"], "alpha");
        assert_eq!(json["files_written"], 1);
        assert_eq!(json["classifications"]["log"], 1);
        assert!(json["duration"].is_object());
    }
}
