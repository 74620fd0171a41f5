use blockpad_engine::model::{Block, Document, DocumentError, document};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document {path}: {source}")]
    InvalidDocument {
        path: PathBuf,
        source: DocumentError,
    },
}

/// Read a text file
pub fn read_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Write a text file, creating parent directories as needed
pub fn write_file(path: &Path, content: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }
    fs::write(path, content).map_err(IoError::Io)
}

/// Read and decode a JSON document
pub fn read_document(path: &Path) -> Result<Document, IoError> {
    let content = read_file(path)?;
    document::from_json(&content).map_err(|source| IoError::InvalidDocument {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`read_document`], but a missing file is an empty document
pub fn read_document_or_empty(path: &Path) -> Result<Document, IoError> {
    match read_document(path) {
        Err(IoError::NotFound(_)) => Ok(Document::new()),
        other => other,
    }
}

/// Encode a document as pretty JSON and write it
pub fn write_document(path: &Path, blocks: &[Block]) -> Result<(), IoError> {
    let json = document::to_json_pretty(blocks).map_err(|source| IoError::InvalidDocument {
        path: path.to_path_buf(),
        source,
    })?;
    write_file(path, &json)
}
