// this_file: fontpick/src/fontinfo.rs
//
// Inspection of fonts already present in the install directory

use crate::{
    utils::{get_file_size, has_extension},
    FontpickError, Result,
};
use log::debug;
use serde::Serialize;
use skrifa::{string::StringId, FontRef, MetadataProvider};
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// A font file found on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledFont {
    /// Location of the file
    pub path: PathBuf,

    /// Size in bytes
    pub size: u64,

    /// Family name from the name table, if the file could be parsed
    pub family: Option<String>,

    /// Whether the font has variation axes
    pub is_variable: bool,
}

/// Metadata read from font bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceSummary {
    pub family: Option<String>,
    pub is_variable: bool,
}

impl FaceSummary {
    /// Read the first face of a font or font collection
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let font = FontRef::from_index(data, 0).map_err(|e| FontpickError::Font(e.to_string()))?;

        // Prefer the typographic family, which groups all weights
        let family = [StringId::TYPOGRAPHIC_FAMILY_NAME, StringId::FAMILY_NAME]
            .into_iter()
            .find_map(|id| font.localized_strings(id).english_or_first())
            .map(|name| name.chars().collect::<String>());

        Ok(Self {
            family,
            is_variable: !font.axes().is_empty(),
        })
    }
}

/// List font files under `dir`, sorted by path. A missing directory has no fonts.
pub fn scan(dir: &Path, extensions: &[String]) -> Result<Vec<InstalledFont>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut fonts = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            FontpickError::Filesystem(format!("Error walking directory {}: {}", dir.display(), e))
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || !has_extension(&entry.file_name().to_string_lossy(), extensions) {
            continue;
        }

        let size = get_file_size(path)?;
        let summary = fs::read(path)
            .map_err(FontpickError::from)
            .and_then(|data| FaceSummary::from_bytes(&data));

        let (family, is_variable) = match summary {
            Ok(summary) => (summary.family, summary.is_variable),
            Err(e) => {
                debug!("Cannot read metadata of {}: {}", path.display(), e);
                (None, false)
            }
        };

        fonts.push(InstalledFont {
            path: path.to_path_buf(),
            size,
            family,
            is_variable,
        });
    }

    Ok(fonts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn exts() -> Vec<String> {
        vec!["ttf".to_string(), "otf".to_string()]
    }

    #[test]
    fn test_garbage_is_a_font_error() {
        let result = FaceSummary::from_bytes(b"definitely not a font");
        assert!(matches!(result, Err(FontpickError::Font(_))));
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempdir().unwrap();
        let fonts = scan(&dir.path().join("nope"), &exts()).unwrap();
        assert!(fonts.is_empty());
    }

    #[test]
    fn test_scan_lists_font_files_recursively() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("Hack");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("b.ttf"), b"1234").unwrap();
        fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();
        fs::write(nested.join("a.OTF"), b"12").unwrap();

        let fonts = scan(dir.path(), &exts()).unwrap();
        let paths: Vec<&Path> = fonts.iter().map(|font| font.path.as_path()).collect();
        assert_eq!(
            paths,
            vec![nested.join("a.OTF").as_path(), dir.path().join("b.ttf").as_path()]
        );

        assert_eq!(fonts[0].size, 2);
        assert_eq!(fonts[1].size, 4);
        // Unparsable files are listed without metadata
        assert_eq!(fonts[1].family, None);
        assert!(!fonts[1].is_variable);
    }
}
