use crate::classifier::ContentClassification;
use crate::document::markdown::{escape_markdown, fenced, format_thousands, format_timestamp};
use crate::scanner::SourceFile;
use std::fmt;

const PATIENT_FIELDS: &[&str] = &[
    "Pacient:",
    "Rodné číslo:",
    "Bydliště:",
    "Pojišťovna:",
    "Telefon:",
    "Věk:",
    "Datum:",
];

const RESULTS_MARKERS: &[&str] = &["Laboratorní výsledky", "Dg.:"];

/// Rendered Markdown for one file: metadata table, then content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownBlock(String);

impl MarkdownBlock {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MarkdownBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContentFormatter;

impl ContentFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(
        &self,
        source: &SourceFile,
        content: &str,
        classification: ContentClassification,
        language: Option<&str>,
    ) -> MarkdownBlock {
        let mut parts = vec![
            "### Metadata".to_string(),
            "| Attribute | Value |".to_string(),
            "|-----------|--------|".to_string(),
            format!("| File Size | {} bytes |", format_thousands(source.size)),
            format!("| Last Modified | {} |", format_timestamp(source.modified)),
            format!("| File Type | {} |", source.dotted_extension()),
            "\n### Content\n".to_string(),
        ];

        let body = match (classification, language) {
            (ContentClassification::MedicalReport, _) => format_medical_report(content),
            (_, Some(language)) => fenced(content, Some(language)),
            (_, None) => fenced(content, None),
        };
        parts.push(body);

        MarkdownBlock(parts.join("\n") + "\n\n")
    }
}

/// Structured rendering for Czech medical reports: a patient table built from
/// labelled lines and a fenced block with everything from the results marker on.
pub fn format_medical_report(content: &str) -> String {
    let lines: Vec<&str> = content.trim().split('\n').collect();

    let mut parts = vec![
        "# LÉKAŘSKÁ ZPRÁVA\n".to_string(),
        "## Informace o pacientovi".to_string(),
        "| Položka | Hodnota |".to_string(),
        "|---------|----------|".to_string(),
    ];

    for line in &lines {
        for field in PATIENT_FIELDS {
            if let Some((_, rest)) = line.split_once(field) {
                let value = rest.split(field).next().unwrap_or_default().trim();
                parts.push(format!(
                    "| {} | {} |",
                    field.trim_end_matches(':'),
                    escape_markdown(value)
                ));
            }
        }
    }

    let results: Vec<&str> = lines
        .iter()
        .skip_while(|line| !RESULTS_MARKERS.iter().any(|marker| line.contains(marker)))
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    parts.push("\n## Výsledky vyšetření".to_string());
    parts.push(fenced(&results.join("\n"), None));

    parts.join("\n")
}
