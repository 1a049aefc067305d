use crate::error::{FolderDigestError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["venv", "__pycache__", ".git"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub filters: FilterConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub exclude_dirs: Vec<String>,
    pub max_depth: usize,
    pub follow_links: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub base_directory: PathBuf,
    pub file_prefix: String,
    /// Output file stem replacing `<prefix><folder name>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Marker and extension lists driving the rule-based classifier.
///
/// Extensions are given without the leading dot. Keywords are matched
/// case-insensitively against the first `sample_chars` characters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub sample_chars: usize,
    pub medical_filename_markers: Vec<String>,
    pub medical_content_markers: Vec<String>,
    pub config_extensions: Vec<String>,
    pub source_extensions: Vec<String>,
    pub sql_extensions: Vec<String>,
    pub sql_keywords: Vec<String>,
    pub log_extensions: Vec<String>,
    pub log_keywords: Vec<String>,
    pub documentation_extensions: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            max_depth: 64,
            follow_links: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_directory: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            file_prefix: "combined_".to_string(),
            file_name: None,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        fn strings(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            sample_chars: 1000,
            medical_filename_markers: strings(&["zpráva", "zprava"]),
            medical_content_markers: strings(&["LÉKAŘSKÁ ZPRÁVA", "Pacient:", "Rodné číslo:"]),
            config_extensions: strings(&["json", "yaml", "yml", "toml", "ini", "conf"]),
            source_extensions: strings(&["py", "js", "java", "cpp", "cs", "php"]),
            sql_extensions: strings(&["sql"]),
            sql_keywords: strings(&["SELECT", "INSERT", "UPDATE", "CREATE TABLE"]),
            log_extensions: strings(&["log"]),
            log_keywords: strings(&["ERROR", "WARNING", "INFO", "[DEBUG]"]),
            documentation_extensions: strings(&["md", "rst", "txt"]),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(FolderDigestError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| FolderDigestError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| FolderDigestError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["folder-digest.toml", ".folder-digest.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        // An explicit exclusion list replaces the defaults rather than extending them.
        if let Some(ref exclude) = cli_args.exclude {
            self.filters.exclude_dirs = exclude.clone();
        }

        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.base_directory = output_dir.clone();
        }

        if let Some(ref name) = cli_args.output_name {
            self.output.file_name = Some(name.clone());
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| FolderDigestError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| FolderDigestError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.filters.max_depth == 0 {
            return Err(FolderDigestError::Config {
                message: "Maximum directory depth must be greater than 0".to_string(),
            });
        }

        if let Some(bad) = self
            .filters
            .exclude_dirs
            .iter()
            .find(|d| d.is_empty() || d.contains('/') || d.contains('\\'))
        {
            return Err(FolderDigestError::Config {
                message: format!(
                    "Excluded folder names must be plain folder names, got '{}'",
                    bad
                ),
            });
        }

        if self.output.file_prefix.is_empty() && self.output.file_name.is_none() {
            return Err(FolderDigestError::Config {
                message: "Output file prefix must not be empty".to_string(),
            });
        }

        if let Some(ref name) = self.output.file_name {
            if name.trim().is_empty() || name.contains('/') || name.contains('\\') {
                return Err(FolderDigestError::Config {
                    message: format!("Invalid output file name: '{}'", name),
                });
            }
        }

        if self.classifier.sample_chars == 0 {
            return Err(FolderDigestError::Config {
                message: "Classifier sample length must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub exclude: Option<Vec<String>>,
    pub output_dir: Option<PathBuf>,
    pub output_name: Option<String>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exclude(mut self, exclude: Option<Vec<String>>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_output_name(mut self, name: Option<String>) -> Self {
        self.output_name = name;
        self
    }
}
