//! Reading and writing profile images on disk.
//!
//! The async variants run on tokio and are only compiled with the `async`
//! feature.

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use rt4k_schema::{ProfileError, Result};

/// Options for writing a profile image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Create missing parent directories before writing.
    pub create_parent_dirs: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            create_parent_dirs: true,
        }
    }
}

fn map_read_error(path: &Path, error: std::io::Error) -> ProfileError {
    if error.kind() == ErrorKind::NotFound {
        ProfileError::not_found(path)
    } else {
        ProfileError::io(path, error)
    }
}

/// Read a whole profile image. A missing file is [`ProfileError::NotFound`].
pub fn read_profile_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|error| map_read_error(path, error))?;
    debug!(path = %path.display(), len = bytes.len(), "read profile");
    Ok(bytes)
}

/// Write a whole profile image, replacing any existing file.
pub fn write_profile_bytes(
    path: impl AsRef<Path>,
    bytes: &[u8],
    options: WriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    if options.create_parent_dirs
        && let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent).map_err(|error| ProfileError::io(parent, error))?;
    }
    std::fs::write(path, bytes).map_err(|error| ProfileError::io(path, error))?;
    debug!(path = %path.display(), len = bytes.len(), "wrote profile");
    Ok(())
}

#[cfg(feature = "async")]
pub async fn read_profile_bytes_async(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|error| map_read_error(path, error))?;
    debug!(path = %path.display(), len = bytes.len(), "read profile");
    Ok(bytes)
}

#[cfg(feature = "async")]
pub async fn write_profile_bytes_async(
    path: impl AsRef<Path>,
    bytes: &[u8],
    options: WriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    if options.create_parent_dirs
        && let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty())
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|error| ProfileError::io(parent, error))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|error| ProfileError::io(path, error))?;
    debug!(path = %path.display(), len = bytes.len(), "wrote profile");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rt4k_schema::ErrorKind as ProfileErrorKind;

    use super::*;

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_profile_bytes(dir.path().join("missing.rt4")).unwrap_err();
        assert_eq!(err.kind(), ProfileErrorKind::NotFound);
    }

    #[test]
    fn test_write_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/profile.rt4");
        write_profile_bytes(&path, b"RT4K Profile", WriteOptions::default()).unwrap();
        assert_eq!(read_profile_bytes(&path).unwrap(), b"RT4K Profile");
    }

    #[test]
    fn test_write_without_parents_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent/profile.rt4");
        let options = WriteOptions {
            create_parent_dirs: false,
        };
        let err = write_profile_bytes(&path, b"x", options).unwrap_err();
        assert_eq!(err.kind(), ProfileErrorKind::Io);
    }
}
