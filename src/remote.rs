// this_file: fontpick/src/remote.rs
//
// Remote font repository access

use crate::{config::Config, FileError, FontpickError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// One file of a font as listed by the remote repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteFile {
    /// File name, e.g. `Hack-Regular.ttf`
    pub name: String,

    /// URL to fetch the raw bytes from
    pub download_url: String,
}

/// Source of font files.
///
/// Implementations must be usable from several download threads at once.
pub trait RemoteRepository: Send + Sync {
    /// List the files in the directory of font `id`
    fn list_files(&self, id: &str) -> Result<Vec<RemoteFile>>;

    /// Fetch the bytes of one listed file
    fn fetch(&self, file: &RemoteFile) -> std::result::Result<Vec<u8>, FileError>;
}

/// Entry of the GitHub contents API
#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    download_url: Option<String>,
}

/// Body of a contents API answer: an array for a directory, an object for anything else
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing {
    Directory(Vec<ContentEntry>),
    Single(serde_json::Map<String, serde_json::Value>),
}

/// Contents API backend for a GitHub repository
pub struct GithubRepository {
    client: reqwest::blocking::Client,
    api_base: Url,
    owner: String,
    repo: String,
    branch: String,
    font_path: String,
    token: Option<String>,
    listing_timeout: Duration,
    download_timeout: Duration,
}

impl GithubRepository {
    /// Create a backend from the configuration
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_client(config, reqwest::blocking::Client::builder())
    }

    /// Create a backend from the configuration and a preconfigured client builder
    pub fn with_client(
        config: &Config,
        builder: reqwest::blocking::ClientBuilder,
    ) -> Result<Self> {
        let client = builder
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FontpickError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_url()?,
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            branch: config.branch.clone(),
            font_path: config.font_path.clone(),
            token: config.token.clone(),
            listing_timeout: config.listing_timeout(),
            download_timeout: config.download_timeout(),
        })
    }

    /// Contents API URL listing the directory of font `id`
    pub fn listing_url(&self, id: &str) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                FontpickError::Config(format!("API base cannot hold a path: {}", self.api_base))
            })?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str(), "contents"])
            .extend(self.font_path.split('/').filter(|segment| !segment.is_empty()))
            .push(id);
        url.query_pairs_mut().append_pair("ref", &self.branch);
        Ok(url)
    }
}

impl RemoteRepository for GithubRepository {
    fn list_files(&self, id: &str) -> Result<Vec<RemoteFile>> {
        let url = self.listing_url(id)?;
        debug!("Listing {}", url);

        let mut request = self
            .client
            .get(url.as_str())
            .header("Accept", "application/vnd.github+json")
            .timeout(self.listing_timeout);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(listing_error(id, status.as_u16(), url.as_str()));
        }

        let body = response.text()?;
        parse_listing(id, status.as_u16(), &body)
    }

    fn fetch(&self, file: &RemoteFile) -> std::result::Result<Vec<u8>, FileError> {
        debug!("Downloading {}", file.download_url);

        let response = self
            .client
            .get(&file.download_url)
            .timeout(self.download_timeout)
            .send()
            .map_err(|e| FileError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FileError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .map_err(|e| FileError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Map a failed listing status to an error. 404 means the font is gone upstream.
pub(crate) fn listing_error(id: &str, status: u16, url: &str) -> FontpickError {
    if status == 404 {
        FontpickError::RemoteNotFound {
            id: id.to_string(),
            status,
        }
    } else {
        FontpickError::Remote {
            status,
            url: url.to_string(),
        }
    }
}

/// Parse a contents API listing, keeping plain files in listing order.
/// An object body means `font/<id>` is not a directory.
fn parse_listing(id: &str, status: u16, body: &str) -> Result<Vec<RemoteFile>> {
    let entries = match serde_json::from_str(body)? {
        Listing::Directory(entries) => entries,
        Listing::Single(_) => {
            return Err(FontpickError::RemoteNotFound {
                id: id.to_string(),
                status,
            })
        }
    };
    Ok(entries
        .into_iter()
        .filter(|entry| entry.kind == "file")
        .filter_map(|entry| {
            entry.download_url.map(|download_url| RemoteFile {
                name: entry.name,
                download_url,
            })
        })
        .collect())
}

// ============================================================================
// Fake repository for testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A repository serving canned listings and downloads
    #[derive(Default)]
    pub struct FakeRepository {
        listings: HashMap<String, std::result::Result<Vec<RemoteFile>, u16>>,
        downloads: HashMap<String, std::result::Result<Vec<u8>, FileError>>,
        list_calls: AtomicUsize,
        fetch_calls: AtomicUsize,
    }

    impl FakeRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Serve `files` for font `id`; an `Err` entry fails that download
        pub fn with_font(
            mut self,
            id: &str,
            files: Vec<(&str, std::result::Result<&[u8], FileError>)>,
        ) -> Self {
            let mut listed = Vec::new();
            for (name, outcome) in files {
                let download_url = format!("https://fake.test/{}/{}", id, name);
                self.downloads
                    .insert(download_url.clone(), outcome.map(|bytes| bytes.to_vec()));
                listed.push(RemoteFile {
                    name: name.to_string(),
                    download_url,
                });
            }
            self.listings.insert(id.to_string(), Ok(listed));
            self
        }

        /// Make the listing of `id` answer with HTTP `status`
        pub fn with_listing_status(mut self, id: &str, status: u16) -> Self {
            self.listings.insert(id.to_string(), Err(status));
            self
        }

        pub fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        pub fn fetch_calls(&self) -> usize {
            self.fetch_calls.load(Ordering::SeqCst)
        }
    }

    impl RemoteRepository for FakeRepository {
        fn list_files(&self, id: &str) -> Result<Vec<RemoteFile>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            let url = format!("https://fake.test/{}", id);
            match self.listings.get(id) {
                Some(Ok(files)) => Ok(files.clone()),
                Some(Err(status)) => Err(listing_error(id, *status, &url)),
                None => Err(listing_error(id, 404, &url)),
            }
        }

        fn fetch(&self, file: &RemoteFile) -> std::result::Result<Vec<u8>, FileError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            self.downloads
                .get(&file.download_url)
                .cloned()
                .unwrap_or(Err(FileError::Status(404)))
        }
    }
}
