// this_file: fontpick/src/installer.rs
//
// Font download and installation workflow

use crate::{
    catalog::Catalog,
    config::Config,
    platform::{InstallTarget, Platform},
    remote::{GithubRepository, RemoteFile, RemoteRepository},
    utils::{safe_join, write_font_file},
    FileError, FileFailure, FontpickError, Result,
};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::{
    io,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    sync::Arc,
};

/// Outcome of a successful install
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallResult {
    /// Font id that was installed
    pub font: String,

    /// Directory the files were written to
    pub directory: PathBuf,

    /// Written files, in remote listing order. Never empty.
    pub installed_paths: Vec<PathBuf>,

    /// Number of font files the remote listing offered
    pub expected_files: usize,

    /// Files that were listed but could not be installed
    pub failures: Vec<FileFailure>,

    /// True only when a cache refresh ran and succeeded
    pub cache_refreshed: bool,

    /// Advisory messages that did not fail the install
    pub warnings: Vec<String>,
}

impl InstallResult {
    /// Whether some listed files were skipped
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Progress of an install call, in the order the steps happen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallEvent {
    ResolvingTarget,
    ListingRemote,
    Downloading {
        total: usize,
    },
    FileFinished {
        index: usize,
        total: usize,
        name: String,
        ok: bool,
    },
    RefreshingCache,
    Done,
}

/// Something that rebuilds the system font cache for a directory
pub trait CacheRefresher: Send + Sync {
    fn refresh(&self, dir: &Path) -> io::Result<()>;
}

/// Runs `fc-cache -f <dir>`
pub struct FcCache {
    program: String,
}

impl FcCache {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl CacheRefresher for FcCache {
    fn refresh(&self, dir: &Path) -> io::Result<()> {
        let status = Command::new(&self.program)
            .arg("-f")
            .arg(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;

        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("{} exited with {}", self.program, status)))
        }
    }
}

/// Installs catalog fonts from a remote repository into the user font directory
pub struct Installer {
    catalog: Arc<Catalog>,
    remote: Box<dyn RemoteRepository>,
    refresher: Box<dyn CacheRefresher>,
    platform: Option<Platform>,
    font_dir: Option<PathBuf>,
    extensions: Vec<String>,
    jobs: usize,
}

impl Installer {
    /// Create an installer using `remote`, with defaults for everything else
    pub fn new(catalog: Arc<Catalog>, remote: Box<dyn RemoteRepository>) -> Self {
        let defaults = Config::default();
        Self {
            catalog,
            remote,
            refresher: Box::new(FcCache::new(defaults.cache_command)),
            platform: None,
            font_dir: None,
            extensions: defaults.extensions,
            jobs: defaults.jobs,
        }
    }

    /// Create an installer talking to the configured GitHub repository
    pub fn from_config(catalog: Arc<Catalog>, config: &Config) -> Result<Self> {
        config.validate()?;
        let remote = GithubRepository::new(config)?;

        Ok(Self::new(catalog, Box::new(remote))
            .with_refresher(Box::new(FcCache::new(config.cache_command.clone())))
            .with_font_dir(config.font_dir.clone())
            .with_extensions(config.extensions.clone())
            .with_jobs(config.jobs))
    }

    pub fn with_refresher(mut self, refresher: Box<dyn CacheRefresher>) -> Self {
        self.refresher = refresher;
        self
    }

    /// Pretend to run on `platform` instead of detecting it
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Install into `dir` instead of the platform font directory
    pub fn with_font_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.font_dir = dir;
        self
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Resolve (and create) the directory fonts would be installed into
    pub fn target(&self) -> Result<InstallTarget> {
        let platform = match self.platform {
            Some(platform) => platform,
            None => Platform::current()?,
        };
        InstallTarget::resolve(platform, self.font_dir.as_ref())
    }

    /// Install font `id`
    pub fn install(&self, id: &str) -> Result<InstallResult> {
        self.install_with_progress(id, &|_| {})
    }

    /// Install font `id`, reporting each step to `observer`.
    ///
    /// Per-file events come from download threads, in completion order.
    pub fn install_with_progress(
        &self,
        id: &str,
        observer: &(dyn Fn(InstallEvent) + Sync),
    ) -> Result<InstallResult> {
        let entry = self.catalog.get(id)?;
        let id = entry.id.as_str();

        observer(InstallEvent::ResolvingTarget);
        let target = self.target()?;
        debug!("Installing {} into {}", id, target.directory.display());

        observer(InstallEvent::ListingRemote);
        let files: Vec<RemoteFile> = self
            .remote
            .list_files(id)?
            .into_iter()
            .filter(|file| crate::utils::has_extension(&file.name, &self.extensions))
            .collect();
        let total = files.len();
        debug!("{} lists {} font file(s)", id, total);

        observer(InstallEvent::Downloading { total });
        let outcomes = self.download_all(&files, &target.directory, observer)?;

        let (installed_paths, failures) = outcomes.into_iter().zip(&files).fold(
            (Vec::new(), Vec::new()),
            |(mut installed, mut failed), (outcome, file)| {
                match outcome {
                    Ok(path) => installed.push(path),
                    Err(error) => failed.push(FileFailure {
                        name: file.name.clone(),
                        error,
                    }),
                }
                (installed, failed)
            },
        );

        if installed_paths.is_empty() {
            return Err(FontpickError::InstallFailed {
                id: id.to_string(),
                failures,
            });
        }

        let mut warnings = Vec::new();
        let cache_refreshed = if target.platform.supports_cache_refresh() {
            observer(InstallEvent::RefreshingCache);
            match self.refresher.refresh(&target.directory) {
                Ok(()) => true,
                Err(e) => {
                    let message = format!("Font cache refresh failed: {}", e);
                    warn!("{}", message);
                    warnings.push(message);
                    false
                }
            }
        } else {
            false
        };

        info!(
            "Installed {} of {} file(s) for {}",
            installed_paths.len(),
            total,
            id
        );
        observer(InstallEvent::Done);

        Ok(InstallResult {
            font: id.to_string(),
            directory: target.directory,
            installed_paths,
            expected_files: total,
            failures,
            cache_refreshed,
            warnings,
        })
    }

    /// Download and write every file, returning one outcome per file in listing order
    fn download_all(
        &self,
        files: &[RemoteFile],
        directory: &Path,
        observer: &(dyn Fn(InstallEvent) + Sync),
    ) -> Result<Vec<std::result::Result<PathBuf, FileError>>> {
        let total = files.len();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs.min(total.max(1)))
            .build()
            .map_err(|e| FontpickError::Other(format!("cannot start download pool: {}", e)))?;

        Ok(pool.install(|| {
            files
                .par_iter()
                .enumerate()
                .map(|(index, file)| {
                    let outcome = self.install_file(file, directory);
                    observer(InstallEvent::FileFinished {
                        index,
                        total,
                        name: file.name.clone(),
                        ok: outcome.is_ok(),
                    });
                    outcome
                })
                .collect()
        }))
    }

    /// Fetch one file and write it into `directory`
    fn install_file(
        &self,
        file: &RemoteFile,
        directory: &Path,
    ) -> std::result::Result<PathBuf, FileError> {
        let path = safe_join(directory, &file.name).ok_or(FileError::InvalidName)?;
        let outcome = self.remote.fetch(file).and_then(|bytes| {
            write_font_file(&path, &bytes).map_err(|e| FileError::Write(e.to_string()))
        });

        match outcome {
            Ok(()) => {
                debug!("Wrote {}", path.display());
                Ok(path)
            }
            Err(e) => {
                warn!("Skipping {}: {}", file.name, e);
                Err(e)
            }
        }
    }
}
