use crate::config::ClassifierConfig;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentClassification {
    MedicalReport,
    Config,
    SourceCode,
    Sql,
    Log,
    Documentation,
    Default,
}

impl ContentClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentClassification::MedicalReport => "medical_report",
            ContentClassification::Config => "config",
            ContentClassification::SourceCode => "source_code",
            ContentClassification::Sql => "sql",
            ContentClassification::Log => "log",
            ContentClassification::Documentation => "documentation",
            ContentClassification::Default => "default",
        }
    }
}

impl fmt::Display for ContentClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assigns a presentation category to extracted content.
///
/// Implementations must be deterministic and total.
pub trait Classifier {
    fn classify(&self, filename: &str, content: &str) -> ContentClassification;
}

/// Priority-ordered rules: medical markers, config, source, SQL, log,
/// documentation, then default. The first rule that matches wins.
pub struct RuleClassifier {
    sample_chars: usize,
    medical_filename_markers: Vec<String>,
    medical_content: Option<Regex>,
    config_extensions: Vec<String>,
    source_extensions: Vec<String>,
    sql_extensions: Vec<String>,
    sql_content: Option<Regex>,
    log_extensions: Vec<String>,
    log_content: Option<Regex>,
    documentation_extensions: Vec<String>,
}

impl RuleClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            sample_chars: config.sample_chars,
            medical_filename_markers: lowercase_all(&config.medical_filename_markers),
            medical_content: keyword_pattern(&config.medical_content_markers),
            config_extensions: lowercase_all(&config.config_extensions),
            source_extensions: lowercase_all(&config.source_extensions),
            sql_extensions: lowercase_all(&config.sql_extensions),
            sql_content: keyword_pattern(&config.sql_keywords),
            log_extensions: lowercase_all(&config.log_extensions),
            log_content: keyword_pattern(&config.log_keywords),
            documentation_extensions: lowercase_all(&config.documentation_extensions),
        }
    }

    fn sample<'a>(&self, content: &'a str) -> &'a str {
        match content.char_indices().nth(self.sample_chars) {
            Some((end, _)) => &content[..end],
            None => content,
        }
    }
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

impl Classifier for RuleClassifier {
    fn classify(&self, filename: &str, content: &str) -> ContentClassification {
        let filename = filename.to_lowercase();
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or_default();
        let sample = self.sample(content);

        let has_extension = |list: &[String]| list.iter().any(|e| e == extension);
        let mentions = |pattern: &Option<Regex>| pattern.as_ref().is_some_and(|p| p.is_match(sample));

        if self
            .medical_filename_markers
            .iter()
            .any(|marker| filename.contains(marker.as_str()))
            || mentions(&self.medical_content)
        {
            ContentClassification::MedicalReport
        } else if has_extension(&self.config_extensions) {
            ContentClassification::Config
        } else if has_extension(&self.source_extensions) {
            ContentClassification::SourceCode
        } else if has_extension(&self.sql_extensions) || mentions(&self.sql_content) {
            ContentClassification::Sql
        } else if has_extension(&self.log_extensions) || mentions(&self.log_content) {
            ContentClassification::Log
        } else if has_extension(&self.documentation_extensions) {
            ContentClassification::Documentation
        } else {
            ContentClassification::Default
        }
    }
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim_start_matches('.').to_lowercase())
        .collect()
}

/// Case-insensitive alternation of the keywords. A keyword edge made of a
/// word character only matches on a word boundary, so `INFO` does not fire
/// inside `information`.
fn keyword_pattern(keywords: &[String]) -> Option<Regex> {
    let alternatives: Vec<String> = keywords
        .iter()
        .filter(|k| !k.is_empty())
        .map(|keyword| {
            let starts_word = keyword.chars().next().is_some_and(is_word_char);
            let ends_word = keyword.chars().last().is_some_and(is_word_char);
            format!(
                "{}{}{}",
                if starts_word { r"\b" } else { "" },
                regex::escape(keyword),
                if ends_word { r"\b" } else { "" }
            )
        })
        .collect();

    if alternatives.is_empty() {
        return None;
    }

    RegexBuilder::new(&alternatives.join("|"))
        .case_insensitive(true)
        .build()
        .ok()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(filename: &str, content: &str) -> ContentClassification {
        RuleClassifier::default().classify(filename, content)
    }

    #[test]
    fn test_medical_marker_beats_documentation() {
        assert_eq!(
            classify("zprava.txt", "Pacient: Jan Novák\nDatum: 1.1.2024"),
            ContentClassification::MedicalReport
        );
        assert_eq!(
            classify("Zpráva_2024.pdf", "anything"),
            ContentClassification::MedicalReport
        );
        assert_eq!(
            classify("notes.json", "lékařská zpráva"),
            ContentClassification::MedicalReport
        );
    }

    #[test]
    fn test_extension_rules() {
        assert_eq!(classify("settings.yaml", "a: 1"), ContentClassification::Config);
        assert_eq!(classify("app.TOML", ""), ContentClassification::Config);
        assert_eq!(classify("main.py", "print(1)"), ContentClassification::SourceCode);
        assert_eq!(classify("schema.sql", ""), ContentClassification::Sql);
        assert_eq!(classify("server.log", ""), ContentClassification::Log);
        assert_eq!(classify("README.md", "# Title"), ContentClassification::Documentation);
        assert_eq!(classify("slides.pptx", "## Slide 1"), ContentClassification::Default);
    }

    #[test]
    fn test_config_extension_beats_sql_keywords() {
        assert_eq!(
            classify("queries.json", "{\"q\": \"SELECT * FROM t\"}"),
            ContentClassification::Config
        );
    }

    #[test]
    fn test_content_keywords_are_case_insensitive() {
        assert_eq!(
            classify("dump.txt", "select id from users"),
            ContentClassification::Sql
        );
        assert_eq!(
            classify("output.txt", "2024-01-01 Error: disk full"),
            ContentClassification::Log
        );
        assert_eq!(
            classify("trace.txt", "[debug] starting"),
            ContentClassification::Log
        );
    }

    #[test]
    fn test_keywords_respect_word_boundaries() {
        assert_eq!(
            classify("about.txt", "More information inside."),
            ContentClassification::Documentation
        );
        assert_eq!(
            classify("about.txt", "Updated selection of errors-free items"),
            ContentClassification::Documentation
        );
    }

    #[test]
    fn test_only_sample_is_inspected() {
        let mut content = "x".repeat(1000);
        content.push_str(" SELECT 1");
        assert_eq!(classify("late.txt", &content), ContentClassification::Documentation);

        let mut content = "é".repeat(990);
        content.push_str(" SELECT 1");
        assert_eq!(classify("early.txt", &content), ContentClassification::Sql);
    }

    #[test]
    fn test_custom_rules() {
        let mut config = ClassifierConfig::default();
        config.medical_content_markers = vec!["Patient:".to_string()];
        config.documentation_extensions.push("adoc".to_string());
        let classifier = RuleClassifier::new(&config);

        assert_eq!(
            classifier.classify("visit.txt", "Patient: John"),
            ContentClassification::MedicalReport
        );
        assert_eq!(
            classifier.classify("visit.txt", "Pacient: Jan"),
            ContentClassification::Documentation
        );
        assert_eq!(
            classifier.classify("guide.adoc", "= Guide"),
            ContentClassification::Documentation
        );
    }

    #[test]
    fn test_no_extension_defaults() {
        assert_eq!(classify("Makefile", "all:"), ContentClassification::Default);
        assert_eq!(ContentClassification::Default.to_string(), "default");
    }
}
