//! Filesystem helpers shared by the build and fallback paths

use std::io;
use std::path::Path;
use tracing::debug;

/// Creates `dir` and any missing parents.
///
/// Succeeds when the directory already exists, including when another task
/// creates it concurrently. Fails if `dir` exists but is not a directory.
pub async fn ensure_dir(dir: &Path) -> io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;

    let metadata = tokio::fs::metadata(dir).await?;
    if !metadata.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} exists and is not a directory", dir.display()),
        ));
    }

    debug!(dir = %dir.display(), "Output directory present");
    Ok(())
}

/// Replaces the file at `path` with `contents`.
///
/// Data goes to a sibling temporary file first and is renamed into place, so
/// a concurrent reader sees either the previous file or the complete new one.
pub async fn replace_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} has no file name", path.display()),
            )
        })?;
    let staging = path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()));

    tokio::fs::write(&staging, contents).await?;
    if let Err(e) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e);
    }
    Ok(())
}
