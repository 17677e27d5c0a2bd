//! File system helpers used by the rendering pipeline
//!
//! - [`ensure_dir`] / [`ensure_parent_dir`] create output directories on demand
//! - [`atomic_write`] replaces a file through a temp-file-then-rename so readers
//!   never observe a half-written output
//! - [`read_optional_text`] reads a file that is allowed to be absent
//! - [`modified_time`] reads a file's modification timestamp

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::SystemTime;

/// Ensures a directory exists, creating it and its parents if needed.
///
/// # Errors
///
/// Fails if the directory cannot be created, or if `path` exists but is not a
/// directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Ensures that the parent directory of a file path exists.
///
/// Paths without a parent (or with an empty one, like `out.rs`) are left alone.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Atomically writes text to a file using a write-then-rename strategy.
///
/// 1. Writes the content to a temporary file in the destination directory
/// 2. Syncs the temporary file to disk
/// 3. Renames it over the target path
///
/// The parent directory is created when missing. The file either contains the
/// old content or the new content, never a partial write.
///
/// Preserves file permissions on existing files. New files get the default
/// mode for the process umask, as `fs::File::create` would give them.
///
/// ```rust,no_run
/// use codegen_cli::utils::fs::atomic_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// atomic_write(Path::new("src/generated/model.rs"), "pub struct Model;\n")?;
/// # Ok(())
/// # }
/// ```
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let existing = match fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to read metadata for: {}", path.display()));
        }
    };

    let mut temp = temp_file_builder()
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temp file in: {}", dir.display()))?;

    if let Some(permissions) = existing {
        temp.as_file().set_permissions(permissions).with_context(|| {
            format!("Failed to copy permissions of existing file: {}", path.display())
        })?;
    }

    temp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write temp file for: {}", path.display()))?;
    temp.as_file().sync_all().with_context(|| "Failed to sync file to disk")?;

    temp.persist(path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

// The requested mode is filtered through the umask when the file is opened.
#[cfg(unix)]
fn temp_file_builder() -> tempfile::Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;

    let mut builder = tempfile::Builder::new();
    builder.permissions(fs::Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn temp_file_builder() -> tempfile::Builder<'static, 'static> {
    tempfile::Builder::new()
}

/// Reads a UTF-8 text file that may legitimately be missing.
///
/// Returns `Ok(None)` when the file does not exist; any other failure is an error.
pub fn read_optional_text(path: &Path) -> std::io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Gets the modification time of a file.
pub fn modified_time(path: &Path) -> std::io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}
