//! Reading documents from disk for upload.
//!
//! Only PDFs are accepted. The type is decided by file extension; content is
//! not sniffed, so a corrupt PDF is left for the backend to reject.

use std::path::Path;

use docent_types::api::DocumentFile;
use docent_types::error::DocumentError;

/// Read `path` into a [`DocumentFile`] ready for upload.
///
/// # Errors
///
/// - [`DocumentError::Unsupported`] if the extension is not `.pdf`.
/// - [`DocumentError::Io`] if the file cannot be read.
/// - [`DocumentError::Empty`] if the file has no content.
pub async fn read_document(path: &Path) -> Result<DocumentFile, DocumentError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| DocumentError::Io(format!("{} is not a file", path.display())))?;

    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(DocumentError::Unsupported(name));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| DocumentError::Io(format!("{}: {e}", path.display())))?;
    if bytes.is_empty() {
        return Err(DocumentError::Empty);
    }

    tracing::debug!(file = %name, size_bytes = bytes.len(), "Document read");
    Ok(DocumentFile::pdf(name, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reads_pdf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Report.PDF");
        tokio::fs::write(&path, b"%PDF-1.7 content").await.unwrap();

        let file = read_document(&path).await.unwrap();
        assert_eq!(file.name, "Report.PDF");
        assert!(file.is_pdf());
        assert_eq!(file.size_bytes(), 16);
    }

    #[tokio::test]
    async fn test_rejects_non_pdf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        tokio::fs::write(&path, b"hello").await.unwrap();

        let err = read_document(&path).await.unwrap_err();
        assert!(matches!(err, DocumentError::Unsupported(name) if name == "notes.txt"));
    }

    #[tokio::test]
    async fn test_rejects_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        tokio::fs::write(&path, b"").await.unwrap();

        assert!(matches!(read_document(&path).await, Err(DocumentError::Empty)));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = read_document(&dir.path().join("absent.pdf")).await.unwrap_err();
        assert!(matches!(err, DocumentError::Io(_)));
    }
}
