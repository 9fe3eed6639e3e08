// this_file: fontpick/src/config.rs
//
// Runtime configuration for the installer

use crate::{FontpickError, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};
use url::Url;

/// Settings for where fonts come from and how they are installed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Owner of the remote repository
    pub owner: String,

    /// Name of the remote repository
    pub repo: String,

    /// Branch to list files from
    pub branch: String,

    /// Base URL of the contents API
    pub api_base: String,

    /// Directory inside the repository holding one directory per font
    pub font_path: String,

    /// Bearer token for the API, if any
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Timeout for directory listings, in seconds
    pub listing_timeout_secs: u64,

    /// Timeout for each file download, in seconds
    pub download_timeout_secs: u64,

    /// Parallel downloads per font
    pub jobs: usize,

    /// Install here instead of the platform font directory
    pub font_dir: Option<PathBuf>,

    /// File extensions treated as font files
    pub extensions: Vec<String>,

    /// Program used to refresh the font cache on linux
    pub cache_command: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: "ProgrammingFonts".to_string(),
            repo: "ProgrammingFonts".to_string(),
            branch: "master".to_string(),
            api_base: "https://api.github.com".to_string(),
            font_path: "font".to_string(),
            token: None,
            listing_timeout_secs: 10,
            download_timeout_secs: 30,
            jobs: num_cpus::get(),
            font_dir: None,
            extensions: ["ttf", "otf", "woff", "woff2", "ttc"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            cache_command: "fc-cache".to_string(),
        }
    }
}

impl Config {
    /// Check the configuration for values that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.owner.is_empty() || self.repo.is_empty() {
            return Err(FontpickError::Config(
                "repository owner and name must not be empty".to_string(),
            ));
        }
        if self.listing_timeout_secs == 0 || self.download_timeout_secs == 0 {
            return Err(FontpickError::Config(
                "timeouts must be at least one second".to_string(),
            ));
        }
        if self.jobs == 0 {
            return Err(FontpickError::Config(
                "jobs must be at least 1".to_string(),
            ));
        }
        if self.extensions.is_empty() {
            return Err(FontpickError::Config(
                "at least one font extension is required".to_string(),
            ));
        }
        self.api_url()?;
        Ok(())
    }

    /// Parsed API base URL
    pub fn api_url(&self) -> Result<Url> {
        Url::parse(&self.api_base).map_err(|e| {
            FontpickError::Config(format!("invalid API base '{}': {}", self.api_base, e))
        })
    }

    /// Set owner and repository from an `owner/name` string
    pub fn set_repository(&mut self, value: &str) -> Result<()> {
        match value.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                self.owner = owner.to_string();
                self.repo = repo.to_string();
                Ok(())
            }
            _ => Err(FontpickError::Config(format!(
                "repository must look like OWNER/NAME, got '{}'",
                value
            ))),
        }
    }

    /// `owner/name` of the remote repository
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Browser URL of the repository
    pub fn repository_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }

    /// Browser URL of one font's directory
    pub fn font_url(&self, id: &str) -> String {
        let mut url = format!(
            "{}/tree/{}/{}",
            self.repository_url(),
            self.branch,
            self.font_path
        );
        url.push('/');
        url.push_str(&id.replace(' ', "%20"));
        url
    }

    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Whether a file name has one of the configured font extensions
    pub fn is_font_file_name(&self, name: &str) -> bool {
        crate::utils::has_extension(name, &self.extensions)
    }
}
