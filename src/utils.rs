// this_file: fontpick/src/utils.rs
//
// Utility functions and helpers

use crate::Result;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// Get the size of a file in bytes
pub fn get_file_size(path: &Path) -> Result<u64> {
    let metadata = fs::metadata(path)?;
    Ok(metadata.len())
}

/// Check whether a file name ends in one of `extensions`, ignoring case
pub fn has_extension(name: &str, extensions: &[String]) -> bool {
    match Path::new(name).extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy();
            extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(&ext))
        }
        None => false,
    }
}

/// Join a remote file name onto `dir`, refusing anything but a plain file name
pub fn safe_join(dir: &Path, name: &str) -> Option<PathBuf> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', ':', '\0'])
    {
        return None;
    }
    Some(dir.join(name))
}

/// Create `dir` and its parents, readable by others but writable only by the user
pub fn create_user_dir(dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder.create(dir)?;
    Ok(())
}

/// Write `bytes` to `path`, replacing any existing file.
/// The result is never executable, even when an executable file was replaced.
pub fn write_font_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let mut file = options.open(path)?;

    // The open mode only applies to new files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o644))?;
    }

    file.write_all(bytes)?;
    file.flush()
}
