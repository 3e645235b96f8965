//! Document reading and fragment writing.

use crate::error::{IoError, Result};
use std::path::Path;

/// Maximum document size read into memory (1GB).
const MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Reads a whole document asynchronously.
///
/// # Arguments
///
/// * `path` - Path to the document.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file doesn't exist, or
/// [`IoError::ReadFailed`] if it cannot be read or is too large.
pub async fn read_document<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path_ref = path.as_ref();
    let path_str = path_ref.to_string_lossy().to_string();

    let metadata = tokio::fs::metadata(path_ref).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path_str.clone(),
            }
        } else {
            IoError::ReadFailed {
                path: path_str.clone(),
                reason: e.to_string(),
            }
        }
    })?;

    if metadata.len() > MAX_FILE_SIZE {
        return Err(IoError::ReadFailed {
            path: path_str,
            reason: format!(
                "file too large: {} bytes (max: {MAX_FILE_SIZE} bytes)",
                metadata.len()
            ),
        }
        .into());
    }

    tokio::fs::read(path_ref).await.map_err(|e| {
        IoError::ReadFailed {
            path: path_str,
            reason: e.to_string(),
        }
        .into()
    })
}

/// Writes fragments to numbered files in a directory.
///
/// Files are named `{prefix}_{index:04}.{extension}`, numbered from 1.
///
/// # Arguments
///
/// * `out_dir` - Output directory, created if missing.
/// * `prefix` - Filename prefix.
/// * `extension` - Filename extension without the dot; empty for none.
/// * `blobs` - Fragment bytes in order.
///
/// # Returns
///
/// Paths of the written files.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be
/// written.
pub fn write_chunks<P: AsRef<Path>>(
    out_dir: P,
    prefix: &str,
    extension: &str,
    blobs: &[Vec<u8>],
) -> Result<Vec<String>> {
    let out_path = out_dir.as_ref();
    let out_str = out_path.to_string_lossy().to_string();

    if !out_path.exists() {
        std::fs::create_dir_all(out_path).map_err(|e| IoError::DirectoryFailed {
            path: out_str.clone(),
            reason: e.to_string(),
        })?;
    }

    let mut paths = Vec::with_capacity(blobs.len());

    for (i, blob) in blobs.iter().enumerate() {
        let filename = if extension.is_empty() {
            format!("{prefix}_{:04}", i + 1)
        } else {
            format!("{prefix}_{:04}.{extension}", i + 1)
        };
        let file_path = out_path.join(&filename);
        let file_str = file_path.to_string_lossy().to_string();

        std::fs::write(&file_path, blob).map_err(|e| IoError::WriteFailed {
            path: file_str.clone(),
            reason: e.to_string(),
        })?;

        paths.push(file_str);
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doc.bin");
        std::fs::write(&path, [0u8, 159, 146, 150]).unwrap();

        let bytes = read_document(&path).await.unwrap();
        assert_eq!(bytes, vec![0u8, 159, 146, 150]);
    }

    #[tokio::test]
    async fn test_read_missing_document() {
        let result = read_document("/nonexistent/report.pdf").await;
        assert!(matches!(result, Err(Error::Io(IoError::FileNotFound { .. }))));
    }

    #[tokio::test]
    async fn test_read_directory_fails() {
        let temp = TempDir::new().unwrap();
        let result = read_document(temp.path()).await;
        assert!(matches!(result, Err(Error::Io(IoError::ReadFailed { .. }))));
    }

    #[test]
    fn test_write_chunks() {
        let temp = TempDir::new().unwrap();
        let out_dir = temp.path().join("parts");
        let blobs = vec![b"one".to_vec(), b"two".to_vec()];

        let paths = write_chunks(&out_dir, "report", "pdf", &blobs).unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("report_0001.pdf"));
        assert!(paths[1].ends_with("report_0002.pdf"));
        assert_eq!(std::fs::read(&paths[1]).unwrap(), b"two");
    }

    #[test]
    fn test_write_chunks_without_extension() {
        let temp = TempDir::new().unwrap();
        let paths = write_chunks(temp.path(), "part", "", &[b"x".to_vec()]).unwrap();
        assert!(paths[0].ends_with("part_0001"));
    }
}
