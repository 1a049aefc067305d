use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolderDigestError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Input is neither a directory nor a zip archive: {path}")]
    UnsupportedInput { path: String },

    #[error("Archive operation failed: {message}")]
    Archive {
        message: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Directory walk failed: {message}")]
    Walk { message: String },

    #[error("Failed to write output file {path}: {message}")]
    Output { path: String, message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for FolderDigestError {
    fn user_message(&self) -> String {
        match self {
            FolderDigestError::InvalidPath { path } => {
                format!("Invalid input path: {}", path)
            }
            FolderDigestError::UnsupportedInput { path } => {
                format!("Cannot process {}: expected a folder or a zip archive", path)
            }
            FolderDigestError::Archive { message, .. } => {
                format!("Archive could not be processed: {}", message)
            }
            FolderDigestError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            FolderDigestError::Walk { message } => {
                format!("Could not read the folder tree: {}", message)
            }
            FolderDigestError::Output { path, message } => {
                format!("Could not write {}: {}", path, message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            FolderDigestError::InvalidPath { .. } => Some(
                "Check that the path exists and points to a folder or a .zip file.".to_string(),
            ),
            FolderDigestError::UnsupportedInput { .. } => Some(
                "Pass a directory, or pack the files into a zip archive first.".to_string(),
            ),
            FolderDigestError::Archive { .. } => Some(
                "The archive may be corrupt or use an unsupported compression method. Try re-creating it."
                    .to_string(),
            ),
            FolderDigestError::Config { .. } => Some(
                "Check your configuration file syntax, or run with --generate-config to get a sample."
                    .to_string(),
            ),
            FolderDigestError::Output { .. } => Some(
                "Ensure the output directory exists and is writable, or choose another one with --output-dir."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for FolderDigestError {
    fn from(error: zip::result::ZipError) -> Self {
        FolderDigestError::Archive {
            message: error.to_string(),
            source: error,
        }
    }
}

impl From<walkdir::Error> for FolderDigestError {
    fn from(error: walkdir::Error) -> Self {
        FolderDigestError::Walk {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FolderDigestError>;
