//! Persisting a finished archive.

use std::path::Path;

use folio_error::{ArchiveError, ArchiveErrorKind, ArchiveResult};

/// Write `archive` to `path` atomically.
///
/// Parent directories are created as needed. The bytes land in a sibling
/// temporary file first and are renamed into place, so a reader never sees a
/// partially written archive.
///
/// # Errors
///
/// Returns [`ArchiveErrorKind::DirectoryCreation`] or
/// [`ArchiveErrorKind::FileWrite`] when the filesystem refuses.
#[tracing::instrument(skip(archive), fields(path = %path.as_ref().display(), size = archive.len()))]
pub async fn write_archive(path: impl AsRef<Path>, archive: &[u8]) -> ArchiveResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            ArchiveError::new(ArchiveErrorKind::DirectoryCreation(format!(
                "{}: {}",
                parent.display(),
                e
            )))
        })?;
    }

    let mut temp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    tokio::fs::write(&temp_path, archive).await.map_err(|e| {
        ArchiveError::new(ArchiveErrorKind::FileWrite(format!(
            "{}: {}",
            temp_path.display(),
            e
        )))
    })?;

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(ArchiveError::new(ArchiveErrorKind::FileWrite(format!(
            "rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        ))));
    }

    tracing::info!(path = %path.display(), size = archive.len(), "Wrote archive");
    Ok(())
}
