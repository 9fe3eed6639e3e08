// this_file: fontpick/src/platform.rs
//
// Operating system detection and user font directories

use crate::{utils::create_user_dir, FontpickError, Result};
use serde::Serialize;
use std::{ffi::OsString, fmt, path::PathBuf};

/// Operating systems with a known per-user font directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Macos,
    Windows,
}

/// Where a platform keeps user fonts: a base directory variable plus path segments
struct FontDirLayout {
    base_var: &'static str,
    segments: &'static [&'static str],
    refreshes_cache: bool,
}

const LINUX: FontDirLayout = FontDirLayout {
    base_var: "HOME",
    segments: &[".local", "share", "fonts"],
    refreshes_cache: true,
};

const MACOS: FontDirLayout = FontDirLayout {
    base_var: "HOME",
    segments: &["Library", "Fonts"],
    refreshes_cache: false,
};

const WINDOWS: FontDirLayout = FontDirLayout {
    base_var: "LOCALAPPDATA",
    segments: &["Microsoft", "WindowsFonts"],
    refreshes_cache: false,
};

impl Platform {
    /// Platform of the running process
    pub fn current() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
            .ok_or_else(|| FontpickError::UnsupportedPlatform(std::env::consts::OS.to_string()))
    }

    /// Map an OS name as reported by `std::env::consts::OS`
    pub fn from_os(os: &str) -> Option<Self> {
        match os {
            "linux" => Some(Platform::Linux),
            "macos" => Some(Platform::Macos),
            "windows" => Some(Platform::Windows),
            _ => None,
        }
    }

    fn layout(self) -> &'static FontDirLayout {
        match self {
            Platform::Linux => &LINUX,
            Platform::Macos => &MACOS,
            Platform::Windows => &WINDOWS,
        }
    }

    /// Whether a font cache refresh follows an install
    pub fn supports_cache_refresh(self) -> bool {
        self.layout().refreshes_cache
    }

    /// Environment variable naming the base of the font directory
    pub fn base_var(self) -> &'static str {
        self.layout().base_var
    }

    /// User font directory, read from the process environment
    pub fn font_dir(self) -> Result<PathBuf> {
        self.font_dir_from(|key| std::env::var_os(key))
    }

    /// User font directory, with variables looked up through `lookup`.
    ///
    /// Falls back to the `dirs` crate when the variable is unset or empty.
    pub fn font_dir_from<F>(self, lookup: F) -> Result<PathBuf>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let layout = self.layout();
        let base = lookup(layout.base_var)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(|| match self {
                Platform::Windows => dirs::data_local_dir(),
                Platform::Linux | Platform::Macos => dirs::home_dir(),
            })
            .ok_or_else(|| {
                FontpickError::Filesystem(format!(
                    "could not determine the {} directory for {}",
                    layout.base_var, self
                ))
            })?;

        Ok(layout.segments.iter().fold(base, |dir, segment| dir.join(segment)))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Linux => "linux",
            Platform::Macos => "macos",
            Platform::Windows => "windows",
        };
        f.write_str(name)
    }
}

/// Resolved destination for an install
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallTarget {
    /// Absolute user font directory
    pub directory: PathBuf,

    /// Platform the directory was resolved for
    pub platform: Platform,
}

impl InstallTarget {
    /// Resolve the target for `platform`, honoring an explicit directory override.
    /// The directory is created if missing and always returned as an absolute path.
    pub fn resolve(platform: Platform, override_dir: Option<&PathBuf>) -> Result<Self> {
        let directory = match override_dir {
            Some(dir) => dir.clone(),
            None => platform.font_dir()?,
        };
        let directory = std::path::absolute(&directory).map_err(|e| {
            FontpickError::Filesystem(format!(
                "cannot resolve font directory {}: {}",
                directory.display(),
                e
            ))
        })?;

        create_user_dir(&directory).map_err(|e| {
            FontpickError::Filesystem(format!(
                "cannot create font directory {}: {}",
                directory.display(),
                e
            ))
        })?;

        Ok(Self {
            directory,
            platform,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn env_with(key: &'static str, value: &'static str) -> impl Fn(&str) -> Option<OsString> {
        move |wanted| (wanted == key).then(|| OsString::from(value))
    }

    #[test]
    fn test_from_os() {
        assert_eq!(Platform::from_os("linux"), Some(Platform::Linux));
        assert_eq!(Platform::from_os("macos"), Some(Platform::Macos));
        assert_eq!(Platform::from_os("windows"), Some(Platform::Windows));
        assert_eq!(Platform::from_os("freebsd"), None);
    }

    #[test]
    fn test_current_matches_build_target() {
        let current = Platform::current();
        if cfg!(any(target_os = "linux", target_os = "macos", target_os = "windows")) {
            assert!(current.is_ok());
        } else {
            assert!(matches!(current, Err(FontpickError::UnsupportedPlatform(_))));
        }
    }

    #[test]
    fn test_font_dir_layouts() {
        let linux = Platform::Linux
            .font_dir_from(env_with("HOME", "/home/ada"))
            .unwrap();
        assert_eq!(linux, Path::new("/home/ada/.local/share/fonts"));

        let macos = Platform::Macos
            .font_dir_from(env_with("HOME", "/Users/ada"))
            .unwrap();
        assert_eq!(macos, Path::new("/Users/ada/Library/Fonts"));

        let windows = Platform::Windows
            .font_dir_from(env_with("LOCALAPPDATA", "C:/Users/ada/AppData/Local"))
            .unwrap();
        assert!(windows.ends_with("Microsoft/WindowsFonts"));
        assert!(windows.starts_with("C:/Users/ada/AppData/Local"));
    }

    #[test]
    fn test_font_dir_ignores_empty_variable() {
        let dir = Platform::Linux.font_dir_from(env_with("HOME", ""));
        // Either dirs found a home directory or the lookup failed cleanly
        match dir {
            Ok(path) => assert!(path.ends_with(".local/share/fonts")),
            Err(e) => assert!(matches!(e, FontpickError::Filesystem(_))),
        }
    }

    #[test]
    fn test_cache_refresh_only_on_linux() {
        assert!(Platform::Linux.supports_cache_refresh());
        assert!(!Platform::Macos.supports_cache_refresh());
        assert!(!Platform::Windows.supports_cache_refresh());
    }

    #[test]
    fn test_resolve_creates_directory() {
        let dir = tempdir().unwrap();
        let fonts = dir.path().join("share").join("fonts");

        let target = InstallTarget::resolve(Platform::Linux, Some(&fonts)).unwrap();
        assert_eq!(target.directory, fonts);
        assert_eq!(target.platform, Platform::Linux);
        assert!(fonts.is_dir());
    }

    #[test]
    fn test_resolve_makes_relative_directory_absolute() {
        // Relative to the working directory, like a relative --font-dir
        let dir = tempfile::Builder::new().tempdir_in(".").unwrap();
        let relative = dir.path().join("fonts");
        assert!(relative.is_relative());

        let target = InstallTarget::resolve(Platform::Linux, Some(&relative)).unwrap();
        assert!(target.directory.is_absolute());
        assert!(target.directory.ends_with("fonts"));
        assert!(target.directory.is_dir());
        assert_eq!(
            target.directory,
            std::env::current_dir().unwrap().join(&relative)
        );
    }

    #[test]
    fn test_resolve_fails_when_path_is_a_file() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("fonts");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = InstallTarget::resolve(Platform::Linux, Some(&blocker));
        assert!(matches!(result, Err(FontpickError::Filesystem(_))));
    }
}
