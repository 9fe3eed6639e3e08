// Main library entry point for fontpick
use serde::Serialize;
use thiserror::Error;

/// Error type for fontpick
#[derive(Error, Debug)]
pub enum FontpickError {
    /// Font id is not in the catalog
    #[error("Font not found in catalog: {0}")]
    NotFound(String),

    /// Current operating system has no known user font directory
    #[error("Unsupported operating system: {0}")]
    UnsupportedPlatform(String),

    /// Transport or timeout failure talking to the remote repository
    #[error("Network error: {0}")]
    Network(String),

    /// Remote repository has no directory for this font
    #[error("Font '{id}' not found in remote repository (HTTP {status})")]
    RemoteNotFound { id: String, status: u16 },

    /// Any other non-success listing response
    #[error("Remote repository error: HTTP {status} from {url}")]
    Remote { status: u16, url: String },

    /// Not a single file of the font could be installed
    #[error("Failed to install {id}: {}", describe_failures(.failures))]
    InstallFailed { id: String, failures: Vec<FileFailure> },

    /// Directory creation or write failures
    #[error("Filesystem error: {0}")]
    Filesystem(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Font parsing errors
    #[error("Font error: {0}")]
    Font(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal interface errors
    #[error("Terminal error: {0}")]
    Ui(String),

    /// Other errors
    #[error("Error: {0}")]
    Other(String),
}

/// Why a single remote file could not be installed
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FileError {
    /// Download answered with a non-success status
    #[error("HTTP {0}")]
    Status(u16),

    /// Download failed in transport
    #[error("network: {0}")]
    Network(String),

    /// Remote file name would escape the install directory
    #[error("unsafe file name")]
    InvalidName,

    /// Writing the file to disk failed
    #[error("write: {0}")]
    Write(String),
}

/// A file that was listed remotely but not installed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    /// File name as listed remotely
    pub name: String,

    /// What went wrong
    pub error: FileError,
}

impl std::fmt::Display for FileFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.error)
    }
}

fn describe_failures(failures: &[FileFailure]) -> String {
    if failures.is_empty() {
        return "no font files listed".to_string();
    }
    failures
        .iter()
        .map(|failure| failure.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for fontpick
pub type Result<T> = std::result::Result<T, FontpickError>;

pub mod catalog;
pub mod cli;
pub mod config;
pub mod fontinfo;
pub mod installer;
pub mod platform;
pub mod remote;
#[cfg(feature = "tui")]
pub mod tui;
mod utils;

pub use catalog::{Catalog, FontEntry};
pub use config::Config;
pub use installer::{InstallEvent, InstallResult, Installer};
pub use platform::{InstallTarget, Platform};
pub use remote::{RemoteFile, RemoteRepository};

// Implement From for common error types
impl From<std::io::Error> for FontpickError {
    fn from(err: std::io::Error) -> Self {
        FontpickError::Filesystem(format!("{:?}: {}", err.kind(), err))
    }
}

impl From<reqwest::Error> for FontpickError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FontpickError::Network(format!("request timed out: {}", err))
        } else {
            FontpickError::Network(err.to_string())
        }
    }
}

impl From<String> for FontpickError {
    fn from(err: String) -> Self {
        FontpickError::Other(err)
    }
}

impl From<&str> for FontpickError {
    fn from(err: &str) -> Self {
        FontpickError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: FontpickError = io_err.into();

        match err {
            FontpickError::Filesystem(msg) => {
                assert!(msg.contains("read-only"));
                assert!(msg.contains("PermissionDenied"));
            }
            _ => panic!("Expected Filesystem error"),
        }

        let err: FontpickError = "test error".into();
        match err {
            FontpickError::Other(msg) => assert_eq!(msg, "test error"),
            _ => panic!("Expected Other error"),
        }
    }

    #[test]
    fn test_install_failed_message() {
        let err = FontpickError::InstallFailed {
            id: "Hack".to_string(),
            failures: vec![
                FileFailure {
                    name: "Hack-Regular.ttf".to_string(),
                    error: FileError::Status(500),
                },
                FileFailure {
                    name: "../evil.ttf".to_string(),
                    error: FileError::InvalidName,
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Failed to install Hack: Hack-Regular.ttf (HTTP 500), ../evil.ttf (unsafe file name)"
        );

        let empty = FontpickError::InstallFailed {
            id: "Hack".to_string(),
            failures: Vec::new(),
        };
        assert_eq!(empty.to_string(), "Failed to install Hack: no font files listed");
    }

    #[test]
    fn test_file_error_serializes_with_kind() {
        let json = serde_json::to_value(FileError::Status(404)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "status", "detail": 404}));

        let json = serde_json::to_value(FileError::InvalidName).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "invalid_name"}));
    }
}
