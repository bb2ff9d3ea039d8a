//! Writing emitted artifacts to disk.

use std::path::{Path, PathBuf};

use stratum_common::error::{Result, StratumError};

/// Writes `contents` to `path`, creating its parent directory if needed.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Returns [`StratumError::Io`] if the directory or file cannot be written.
pub fn write_artifact(path: &Path, contents: &str) -> Result<PathBuf> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| StratumError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, contents).map_err(|e| StratumError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "artifact written");
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_missing_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let target = tmp.path().join("nested/out/stack.tf.json");
        let path = write_artifact(&target, "{}").expect("write");
        assert_eq!(path, target);
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "{}");
    }

    #[test]
    fn write_into_file_path_fails_with_io_error() {
        let tmp = tempfile::NamedTempFile::new().expect("temp file");
        let err = write_artifact(&tmp.path().join("x.json"), "{}").unwrap_err();
        assert!(matches!(err, StratumError::Io { .. }));
    }
}
